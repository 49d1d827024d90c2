//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the REST API and OpenAPI schema
//! generation. Account records never serialize directly; the response types
//! here are the only user-shaped data that leaves the service.
use crate::model::{AccessRoleRule, PermissionFlags, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    /// Per-field validation messages, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema, Clone, Default)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MockUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MockProduct {
    pub id: i64,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct RoleCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleListResponse {
    pub items: Vec<Role>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RuleListResponse {
    pub items: Vec<AccessRoleRule>,
}

#[derive(Debug, Deserialize, ToSchema, Clone)]
pub struct RuleCreateRequest {
    pub role_id: i64,
    pub element_id: i64,
    #[serde(flatten)]
    pub flags: PermissionFlags,
}
