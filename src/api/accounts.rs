//! Account lifecycle handlers.
//!
//! # Purpose
//! Implements registration, login/logout, profile management, and account
//! deletion. Login failures return one generic 401 regardless of cause so
//! the endpoint cannot be used to enumerate accounts.
use crate::api::error::{
    api_internal, api_internal_message, api_unauthorized, api_validation_fields, ApiError,
};
use crate::api::types::{
    ErrorResponse, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    ProfileUpdateRequest, RegisterRequest, RegisterResponse, UserSummary,
};
use crate::app::AppState;
use crate::auth::identity::{current_user, extract_bearer};
use crate::auth::password::{hash_password, verify_password};
use crate::model::{NewUser, ProfilePatch};
use crate::store::StoreError;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::collections::BTreeMap;

#[utoipa::path(
    post,
    path = "/register",
    tag = "accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut fields = BTreeMap::new();
    if body.email.trim().is_empty() {
        fields.insert("email".to_string(), "this field is required".to_string());
    }
    if body.password.is_empty() {
        fields.insert("password".to_string(), "this field is required".to_string());
    }
    if body.password != body.password_confirm {
        fields.insert(
            "password_confirm".to_string(),
            "passwords do not match".to_string(),
        );
    }
    if !fields.is_empty() {
        return Err(api_validation_fields(fields));
    }

    match state.store.email_taken(&body.email).await {
        Ok(false) => {}
        Ok(true) => return Err(email_taken_error()),
        Err(err) => return Err(api_internal("failed to check email", &err)),
    }

    let password_hash = hash_password(&body.password, state.bcrypt_cost).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        api_internal_message("failed to process registration")
    })?;

    match state
        .store
        .create_user(NewUser {
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            password_hash,
            is_staff: false,
            is_superuser: false,
            role_id: None,
        })
        .await
    {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "user registered".to_string(),
                user_id: user.id,
            }),
        )),
        // Lost the race against a concurrent registration.
        Err(StoreError::Conflict(_)) => Err(email_taken_error()),
        Err(err) => Err(api_internal("failed to create user", &err)),
    }
}

fn email_taken_error() -> ApiError {
    let mut fields = BTreeMap::new();
    fields.insert("email".to_string(), "already registered".to_string());
    api_validation_fields(fields)
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = match state.store.find_active_user_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(api_unauthorized("invalid credentials")),
        Err(err) => return Err(api_internal("failed to look up user", &err)),
    };
    if !verify_password(&body.password, &user.password_hash) {
        return Err(api_unauthorized("invalid credentials"));
    }

    let issued = state.tokens.issue(user.id, &user.email).map_err(|err| {
        tracing::error!(error = %err, "token issuance failed");
        api_internal_message("failed to open session")
    })?;
    state
        .store
        .open_session(user.id, &issued.token, issued.expires_at)
        .await
        .map_err(|err| api_internal("failed to record session", &err))?;

    metrics::counter!("authgate_logins_total").increment(1);
    Ok(Json(LoginResponse {
        token: issued.token,
        user: UserSummary {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "accounts",
    responses(
        (status = 200, description = "Session closed if one was presented", body = MessageResponse)
    )
)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<MessageResponse> {
    // Tolerant by contract: close whatever was presented, answer 200 even
    // for anonymous or already-closed callers.
    if let Some(token) = extract_bearer(&headers) {
        if let Err(err) = state.store.close_session(token).await {
            tracing::warn!(error = %err, "failed to close session on logout");
        }
    }
    Json(MessageResponse {
        message: "logged out".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "accounts",
    responses(
        (status = 200, description = "Current profile", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = current_user(&state, &headers)
        .await
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    Ok(Json(ProfileResponse {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    }))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "accounts",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = current_user(&state, &headers)
        .await
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    if let Some(email) = &body.email {
        if email.trim().is_empty() {
            let mut fields = BTreeMap::new();
            fields.insert("email".to_string(), "must not be blank".to_string());
            return Err(api_validation_fields(fields));
        }
    }
    match state
        .store
        .update_profile(
            user.id,
            ProfilePatch {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
            },
        )
        .await
    {
        Ok(updated) => Ok(Json(ProfileResponse {
            first_name: updated.first_name,
            last_name: updated.last_name,
            email: updated.email,
        })),
        Err(StoreError::Conflict(_)) => Err(email_taken_error()),
        // The account vanished between resolution and update.
        Err(StoreError::NotFound(_)) => Err(api_unauthorized("authentication required")),
        Err(err) => Err(api_internal("failed to update profile", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/delete-account",
    tag = "accounts",
    responses(
        (status = 200, description = "Account deactivated", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_account(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = current_user(&state, &headers)
        .await
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    match state.store.deactivate_user(user.id).await {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => return Err(api_unauthorized("authentication required")),
        Err(err) => return Err(api_internal("failed to deactivate account", &err)),
    }
    state
        .store
        .close_all_sessions_for_user(user.id)
        .await
        .map_err(|err| api_internal("failed to close sessions", &err))?;
    Ok(Json(MessageResponse {
        message: "account deleted".to_string(),
    }))
}
