//! HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared staff-gate helper used by
//! the admin endpoints.
pub mod accounts;
pub mod admin;
pub mod error;
pub mod openapi;
pub mod resources;
pub mod system;
pub mod types;

use crate::api::error::{api_forbidden, api_unauthorized, ApiError};
use crate::app::AppState;
use crate::auth::identity::current_user;
use crate::model::User;
use axum::http::HeaderMap;

/// Resolve the caller and require the staff flag.
///
/// The staff gate is deliberately independent of the policy table: policy
/// rules govern business elements, while staff controls who edits policy.
pub(crate) async fn require_staff(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let user = current_user(state, headers)
        .await
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    if !user.is_staff {
        return Err(api_forbidden("access denied"));
    }
    Ok(user)
}
