//! OpenAPI schema aggregation.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for
//! the `/docs` UI and client generation.
use crate::api::{
    accounts, admin, resources, system,
    types::{
        ErrorResponse, HealthStatus, LoginRequest, LoginResponse, MessageResponse, MockProduct,
        MockUser, ProfileResponse, ProfileUpdateRequest, RegisterRequest, RegisterResponse,
        RoleCreateRequest, RoleListResponse, RuleCreateRequest, RuleListResponse, UserSummary,
    },
};
use crate::model::{AccessRoleRule, BusinessElement, PermissionFlags, Role, RuleFlagsPatch};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "authgate",
        version = "v1",
        description = "Role-based access control service with JWT session authentication"
    ),
    paths(
        system::health,
        accounts::register,
        accounts::login,
        accounts::logout,
        accounts::get_profile,
        accounts::update_profile,
        accounts::delete_account,
        resources::list_users,
        resources::list_products,
        admin::list_roles,
        admin::create_role,
        admin::delete_role,
        admin::list_rules,
        admin::upsert_rule,
        admin::update_rule
    ),
    components(schemas(
        ErrorResponse,
        MessageResponse,
        HealthStatus,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        UserSummary,
        ProfileResponse,
        ProfileUpdateRequest,
        MockUser,
        MockProduct,
        Role,
        BusinessElement,
        PermissionFlags,
        AccessRoleRule,
        RuleFlagsPatch,
        RoleCreateRequest,
        RoleListResponse,
        RuleCreateRequest,
        RuleListResponse
    )),
    tags(
        (name = "system", description = "Health and discovery"),
        (name = "accounts", description = "Registration, sessions, and profile"),
        (name = "resources", description = "Policy-gated business resources"),
        (name = "admin", description = "Role and access-rule management")
    )
)]
pub struct ApiDoc;
