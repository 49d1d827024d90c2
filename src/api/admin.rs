//! Staff-only role and access-rule management.
//!
//! # Purpose
//! CRUD over the policy tables. Every handler goes through `require_staff`;
//! an authenticated non-staff caller gets a generic 403, an anonymous one a
//! 401. Duplicate names are reported as 400 field errors so the contract
//! matches account registration.
use crate::api::error::{
    api_internal, api_not_found, api_validation_fields, ApiError,
};
use crate::api::require_staff;
use crate::api::types::{ErrorResponse, RoleCreateRequest, RoleListResponse, RuleCreateRequest, RuleListResponse};
use crate::app::AppState;
use crate::model::{AccessRoleRule, RuleFlagsPatch};
use crate::store::StoreError;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::collections::BTreeMap;

#[utoipa::path(
    get,
    path = "/admin/roles",
    tag = "admin",
    responses(
        (status = 200, description = "Role list", body = RoleListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    )
)]
pub(crate) async fn list_roles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RoleListResponse>, ApiError> {
    require_staff(&state, &headers).await?;
    let items = state
        .store
        .list_roles()
        .await
        .map_err(|err| api_internal("failed to list roles", &err))?;
    Ok(Json(RoleListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/admin/roles",
    tag = "admin",
    request_body = RoleCreateRequest,
    responses(
        (status = 201, description = "Role created", body = crate::model::Role),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    )
)]
pub(crate) async fn create_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RoleCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&state, &headers).await?;
    if body.name.trim().is_empty() {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), "this field is required".to_string());
        return Err(api_validation_fields(fields));
    }
    match state.store.create_role(&body.name, &body.description).await {
        Ok(role) => Ok((StatusCode::CREATED, Json(role))),
        Err(StoreError::Conflict(_)) => {
            let mut fields = BTreeMap::new();
            fields.insert("name".to_string(), "already exists".to_string());
            Err(api_validation_fields(fields))
        }
        Err(err) => Err(api_internal("failed to create role", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/roles/{role_id}",
    tag = "admin",
    params(
        ("role_id" = i64, Path, description = "Role identifier")
    ),
    responses(
        (status = 204, description = "Role deleted; its rules are removed and users unassigned"),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Unknown role", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_role(
    Path(role_id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_staff(&state, &headers).await?;
    match state.store.delete_role(role_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(StoreError::NotFound(_)) => Err(api_not_found("role not found")),
        Err(err) => Err(api_internal("failed to delete role", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/admin/access-rules",
    tag = "admin",
    responses(
        (status = 200, description = "Access rule list", body = RuleListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    )
)]
pub(crate) async fn list_rules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RuleListResponse>, ApiError> {
    require_staff(&state, &headers).await?;
    let items = state
        .store
        .list_rules()
        .await
        .map_err(|err| api_internal("failed to list access rules", &err))?;
    Ok(Json(RuleListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/admin/access-rules",
    tag = "admin",
    request_body = RuleCreateRequest,
    responses(
        (status = 201, description = "Rule created or replaced", body = AccessRoleRule),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Unknown role or element", body = ErrorResponse)
    )
)]
pub(crate) async fn upsert_rule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RuleCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_staff(&state, &headers).await?;
    match state
        .store
        .upsert_rule(body.role_id, body.element_id, body.flags)
        .await
    {
        Ok(rule) => Ok((StatusCode::CREATED, Json(rule))),
        Err(StoreError::NotFound(what)) => Err(api_not_found(&format!("{what} not found"))),
        Err(err) => Err(api_internal("failed to upsert access rule", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/admin/access-rules/{rule_id}",
    tag = "admin",
    params(
        ("rule_id" = i64, Path, description = "Rule identifier")
    ),
    request_body = RuleFlagsPatch,
    responses(
        (status = 200, description = "Updated rule", body = AccessRoleRule),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse),
        (status = 404, description = "Unknown rule", body = ErrorResponse)
    )
)]
pub(crate) async fn update_rule(
    Path(rule_id): Path<i64>,
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RuleFlagsPatch>,
) -> Result<Json<AccessRoleRule>, ApiError> {
    require_staff(&state, &headers).await?;
    match state.store.update_rule(rule_id, body).await {
        Ok(rule) => Ok(Json(rule)),
        Err(StoreError::NotFound(_)) => Err(api_not_found("access rule not found")),
        Err(err) => Err(api_internal("failed to update access rule", &err)),
    }
}
