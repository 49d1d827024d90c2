mod common;

use authgate::store::AccessStore;
use axum::http::StatusCode;
use common::{login_token, seeded_app};
use http_helpers::{auth_request, get_request};
use tower::ServiceExt;

#[tokio::test]
async fn concurrent_sessions_close_independently() {
    let (app, state) = seeded_app(true).await;
    let first = login_token(&app, "user@example.com", "user123").await;
    let second = login_token(&app, "user@example.com", "user123").await;
    assert_ne!(first, second);

    let account = state
        .store
        .find_active_user_by_email("user@example.com")
        .await
        .expect("lookup")
        .expect("account");
    assert_eq!(
        state
            .store
            .sessions_for_user(account.id)
            .await
            .expect("sessions")
            .len(),
        2
    );

    let response = app
        .clone()
        .oneshot(auth_request("POST", "/logout", &first))
        .await
        .expect("logout");
    assert_eq!(response.status(), StatusCode::OK);

    // Only the logged-out session is dead.
    let response = app
        .clone()
        .oneshot(get_request("/profile", Some(&first)))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = app
        .clone()
        .oneshot(get_request("/profile", Some(&second)))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logged_out_token_survives_without_session_enforcement() {
    // Reference behavior: ordinary requests trust the token until it
    // expires, so logout does not lock the bearer out.
    let (app, _state) = seeded_app(false).await;
    let token = login_token(&app, "user@example.com", "user123").await;

    let response = app
        .clone()
        .oneshot(auth_request("POST", "/logout", &token))
        .await
        .expect("logout");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/profile", Some(&token)))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logged_out_token_is_rejected_with_session_enforcement() {
    let (app, _state) = seeded_app(true).await;
    let token = login_token(&app, "user@example.com", "user123").await;

    let response = app
        .clone()
        .oneshot(get_request("/profile", Some(&token)))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(auth_request("POST", "/logout", &token))
        .await
        .expect("logout");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/profile", Some(&token)))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_deletion_revokes_every_session() {
    let (app, state) = seeded_app(true).await;
    let first = login_token(&app, "user@example.com", "user123").await;
    let second = login_token(&app, "user@example.com", "user123").await;

    let response = app
        .clone()
        .oneshot(auth_request("POST", "/delete-account", &first))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    for token in [&first, &second] {
        let response = app
            .clone()
            .oneshot(get_request("/profile", Some(token)))
            .await
            .expect("profile");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let account = state
        .store
        .find_active_user_by_email("user@example.com")
        .await
        .expect("lookup");
    assert!(account.is_none());
}

#[tokio::test]
async fn deactivated_account_is_rejected_even_without_enforcement() {
    // With enforcement off, the token itself stays valid after deletion,
    // but identity resolution still refuses inactive accounts.
    let (app, _state) = seeded_app(false).await;
    let token = login_token(&app, "user@example.com", "user123").await;

    let response = app
        .clone()
        .oneshot(auth_request("POST", "/delete-account", &token))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/profile", Some(&token)))
        .await
        .expect("profile");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
