use async_trait::async_trait;
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Session token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: Option<String>, name: Option<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            name,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub expires_at: i64,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
            expires_at: claims.exp,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session expired")]
    Expired,

    #[error("Session secret not configured")]
    MissingSecret,

    #[error("Failed to issue session token: {0}")]
    TokenGeneration(String),
}

/// Answers "who is making this request"; sign-in and sign-up live elsewhere
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Session, AuthError>;
}

/// Validates HS256 session tokens from a bearer header or the session cookie
pub struct JwtSessionProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    cookie_name: String,
    expiry_hours: u64,
}

impl JwtSessionProvider {
    pub fn new(secret: &str, cookie_name: impl Into<String>, expiry_hours: u64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            cookie_name: cookie_name.into(),
            expiry_hours,
        })
    }

    pub fn from_config(config: &SecurityConfig) -> Result<Self, AuthError> {
        Self::new(
            &config.session_secret,
            config.session_cookie.clone(),
            config.session_expiry_hours,
        )
    }

    /// Mint a token for `user_id`; used by the CLI and tests
    pub fn issue(&self, user_id: Uuid, email: Option<String>, name: Option<String>) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, email, name, self.expiry_hours);
        self.encode(&claims)
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let validation = Validation::default();
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            }
        })?;
        Ok(data.claims.into())
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Session, AuthError> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token);

        let token = match bearer {
            Some(token) => token.to_string(),
            None => extract_cookie(headers, &self.cookie_name).ok_or(AuthError::MissingToken)?,
        };
        self.verify(&token)
    }
}

/// Token from an `Authorization: Bearer <token>` value
pub fn extract_bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

/// Value of the named cookie across all `Cookie` headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "notes_test_secret_that_is_long_enough";
    const COOKIE_NAME: &str = "better-auth.session_token";

    fn provider() -> JwtSessionProvider {
        JwtSessionProvider::new(SECRET, COOKIE_NAME, 1).unwrap()
    }

    #[tokio::test]
    async fn accepts_bearer_token() {
        let provider = provider();
        let user = Uuid::new_v4();
        let token = provider.issue(user, Some("a@example.com".into()), None).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());

        let session = provider.get_session(&headers).await.unwrap();
        assert_eq!(session.user_id, user);
        assert_eq!(session.email.as_deref(), Some("a@example.com"));
    }

    #[tokio::test]
    async fn falls_back_to_session_cookie() {
        let provider = provider();
        let user = Uuid::new_v4();
        let token = provider.issue(user, None, None).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}; other=1", COOKIE_NAME, token)).unwrap(),
        );

        assert_eq!(provider.get_session(&headers).await.unwrap().user_id, user);
    }

    #[tokio::test]
    async fn rejects_missing_foreign_and_expired_tokens() {
        let provider = provider();
        assert!(matches!(
            provider.get_session(&HeaderMap::new()).await,
            Err(AuthError::MissingToken)
        ));

        let foreign = JwtSessionProvider::new("another_secret_value", COOKIE_NAME, 1)
            .unwrap()
            .issue(Uuid::new_v4(), None, None)
            .unwrap();
        assert!(matches!(provider.verify(&foreign), Err(AuthError::InvalidToken)));

        let now = Utc::now().timestamp();
        let expired = provider
            .encode(&Claims {
                sub: Uuid::new_v4(),
                email: None,
                name: None,
                exp: now - 3600,
                iat: now - 7200,
            })
            .unwrap();
        assert!(matches!(provider.verify(&expired), Err(AuthError::Expired)));
    }

    #[test]
    fn parses_bearer_and_cookie_values() {
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer   "), None);

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("session=\"xyz\""));
        assert_eq!(extract_cookie(&headers, "session").as_deref(), Some("xyz"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn requires_a_secret() {
        assert!(matches!(
            JwtSessionProvider::new("", COOKIE_NAME, 1),
            Err(AuthError::MissingSecret)
        ));
    }
}
