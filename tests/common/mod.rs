use authgate::app::{build_router, AppState};
use authgate::auth::token::TokenService;
use authgate::store::memory::InMemoryStore;
use authgate::store::seed;
use axum::body::Body;
use axum::http::Request;
use std::sync::Arc;
use tower::ServiceExt;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn test_state(enforce_sessions: bool) -> AppState {
    AppState {
        store: Arc::new(InMemoryStore::new()),
        tokens: Arc::new(TokenService::new("integration-test-secret", 3600)),
        bcrypt_cost: 4,
        enforce_sessions,
    }
}

pub async fn seeded_state(enforce_sessions: bool) -> AppState {
    let state = test_state(enforce_sessions);
    seed::seed_demo_data(state.store.as_ref(), 4)
        .await
        .expect("seed demo data");
    state
}

/// Log in through the router and return the session token.
pub async fn login_token(app: &axum::Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("login");
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let payload = read_json(response).await;
    payload["token"].as_str().expect("token").to_string()
}

pub async fn seeded_app(enforce_sessions: bool) -> (axum::Router, AppState) {
    let state = seeded_state(enforce_sessions).await;
    (build_router(state.clone()), state)
}
