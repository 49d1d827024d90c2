//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::token::TokenService;
use crate::store::AccessStore;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccessStore>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
    /// When set, every authenticated request re-checks the session registry
    /// instead of trusting the token until its expiry.
    pub enforce_sessions: bool,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route("/health", axum::routing::get(api::system::health))
        .route("/register", axum::routing::post(api::accounts::register))
        .route("/login", axum::routing::post(api::accounts::login))
        .route("/logout", axum::routing::post(api::accounts::logout))
        .route(
            "/profile",
            axum::routing::get(api::accounts::get_profile).put(api::accounts::update_profile),
        )
        .route(
            "/delete-account",
            axum::routing::post(api::accounts::delete_account),
        )
        .route("/users", axum::routing::get(api::resources::list_users))
        .route(
            "/products",
            axum::routing::get(api::resources::list_products),
        )
        .route(
            "/admin/roles",
            axum::routing::get(api::admin::list_roles).post(api::admin::create_role),
        )
        .route(
            "/admin/roles/:role_id",
            axum::routing::delete(api::admin::delete_role),
        )
        .route(
            "/admin/access-rules",
            axum::routing::get(api::admin::list_rules).post(api::admin::upsert_rule),
        )
        .route(
            "/admin/access-rules/:rule_id",
            axum::routing::put(api::admin::update_rule),
        )
        .merge(utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(trace_layer)
        .with_state(state)
}
