//! Mock business resource handlers.
//!
//! # Purpose
//! Stand-in endpoints for the business objects the policy table protects.
//! The payloads are fixed; the point of these handlers is the gate in
//! front of them: resolve the caller, ask the evaluator, 403 on deny.
use crate::api::error::{api_forbidden, api_unauthorized, ApiError};
use crate::api::types::{ErrorResponse, MockProduct, MockUser};
use crate::app::AppState;
use crate::auth::identity::current_user;
use crate::auth::rbac::{authorize, Action};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

#[utoipa::path(
    get,
    path = "/users",
    tag = "resources",
    responses(
        (status = 200, description = "User list", body = [MockUser]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    )
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MockUser>>, ApiError> {
    let user = current_user(&state, &headers)
        .await
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    if !authorize(state.store.as_ref(), Some(&user), "users", Action::Read).await {
        return Err(api_forbidden("access denied"));
    }
    Ok(Json(vec![
        MockUser {
            id: 1,
            name: "User 1".to_string(),
            email: "user1@example.com".to_string(),
        },
        MockUser {
            id: 2,
            name: "User 2".to_string(),
            email: "user2@example.com".to_string(),
        },
    ]))
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "resources",
    responses(
        (status = 200, description = "Product list", body = [MockProduct]),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse)
    )
)]
pub(crate) async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MockProduct>>, ApiError> {
    let user = current_user(&state, &headers)
        .await
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    if !authorize(state.store.as_ref(), Some(&user), "products", Action::Read).await {
        return Err(api_forbidden("access denied"));
    }
    Ok(Json(vec![
        MockProduct {
            id: 1,
            name: "Product 1".to_string(),
            price: 100,
        },
        MockProduct {
            id: 2,
            name: "Product 2".to_string(),
            price: 200,
        },
    ]))
}
