use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::Session;
use crate::error::ApiError;

/// Authenticated user context extracted from the session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl From<Session> for AuthUser {
    fn from(session: Session) -> Self {
        Self {
            user_id: session.user_id,
            email: session.email,
            name: session.name,
        }
    }
}

/// Session middleware: resolves the caller through the session provider and
/// injects [`AuthUser`], or answers 401 with the error envelope
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = state.sessions.get_session(request.headers()).await?;

    tracing::debug!(user_id = %session.user_id, "Authenticated request");
    request.extensions_mut().insert(AuthUser::from(session));

    Ok(next.run(request).await)
}
