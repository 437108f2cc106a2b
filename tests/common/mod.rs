#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use notes_api::app::{app, AppState};
use notes_api::auth::JwtSessionProvider;
use notes_api::config::AppConfig;
use notes_api::database::MemoryNoteStore;

pub const SECRET: &str = "integration_test_session_secret";
pub const COOKIE_NAME: &str = "better-auth.session_token";

/// The real `notes-api` binary on the in-memory store; killed on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_notes-api"));
        cmd.env("APP_ENV", "development")
            .env("NOTES_STORAGE", "memory")
            .env("NOTES_API_HOST", "127.0.0.1")
            .env("NOTES_API_PORT", port.to_string())
            .env("SESSION_SECRET", SECRET)
            .env("SECURITY_SESSION_COOKIE", COOKIE_NAME)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

pub fn token_for(user_id: Uuid) -> String {
    JwtSessionProvider::new(SECRET, COOKIE_NAME, 1)
        .and_then(|provider| provider.issue(user_id, Some("tester@example.com".into()), None))
        .expect("failed to mint test token")
}

/// The router driven in-process over a fresh in-memory store
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let sessions = JwtSessionProvider::new(SECRET, COOKIE_NAME, 1).expect("session provider");
        let state = AppState::new(
            Arc::new(MemoryNoteStore::new()),
            Arc::new(sessions),
            AppConfig::in_memory(),
        );
        Self { router: app(state) }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// JSON request with a bearer token; returns the status and parsed body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.send(request).await;
        let status = response.status();
        (status, json_body(response).await)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a notebook and return its id
    pub async fn notebook(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/notebooks", token, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create notebook: {}", body);
        body["data"]["id"].as_str().expect("notebook id").to_string()
    }

    /// Create a note and return its id
    pub async fn note(&self, token: &str, notebook_id: &str, body: Value) -> String {
        let (status, body) = self
            .post(&format!("/api/notebooks/{}/notes", notebook_id), token, body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "create note: {}", body);
        body["data"]["id"].as_str().expect("note id").to_string()
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn json_body(response: Response) -> Value {
    let text = body_text(response).await;
    if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }
}
