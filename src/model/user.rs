//! User account records.
//!
//! # Purpose
//! Defines the account record, the creation payload, and the partial profile
//! update used by the store and HTTP API.

/// A registered account.
///
/// `password_hash` is a bcrypt hash and never leaves the process; handlers
/// serialize dedicated response types instead of this record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub role_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payload for creating a user; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub role_id: Option<i64>,
}

/// Partial profile update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}
