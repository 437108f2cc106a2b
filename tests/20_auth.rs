mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{TestApp, COOKIE_NAME};
use uuid::Uuid;

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = TestApp::new();

    for uri in ["/api/notebooks", "/api/sidebar", "/api/auth/whoami"] {
        let (status, body) = app.call(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    let (status, _) = app
        .call(Method::GET, "/api/notebooks", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_need_no_session() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["storage"], "ok");
}

#[tokio::test]
async fn whoami_reflects_the_token() {
    let app = TestApp::new();
    let user = Uuid::new_v4();
    let (status, body) = app.get("/api/auth/whoami", &common::token_for(user)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], user.to_string());
    assert_eq!(body["data"]["email"], "tester@example.com");
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = TestApp::new();
    let user = Uuid::new_v4();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/auth/whoami")
        .header(
            header::COOKIE,
            format!("theme=dark; {}={}", COOKIE_NAME, common::token_for(user)),
        )
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["data"]["user_id"], user.to_string());
}
