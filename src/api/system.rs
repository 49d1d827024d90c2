//! Health probe handler.
use crate::api::error::{api_internal, ApiError};
use crate::api::types::HealthStatus;
use crate::app::AppState;
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
/// Probe the backing store and return `ok` if healthy.
pub(crate) async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        return Err(api_internal("storage unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
