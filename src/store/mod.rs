use crate::model::{
    AccessRoleRule, BusinessElement, NewUser, PermissionFlags, ProfilePatch, Role, RuleFlagsPatch,
    Session, User,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod seed;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for accounts, roles, policy rules, and sessions.
///
/// `find_*` methods report absence as `Ok(None)`; mutations on missing
/// records return `StoreError::NotFound`.
#[async_trait]
pub trait AccessStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: i64) -> StoreResult<Option<User>>;
    async fn find_active_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn email_taken(&self, email: &str) -> StoreResult<bool>;
    async fn update_profile(&self, user_id: i64, patch: ProfilePatch) -> StoreResult<User>;
    async fn deactivate_user(&self, user_id: i64) -> StoreResult<()>;

    async fn list_roles(&self) -> StoreResult<Vec<Role>>;
    async fn find_role(&self, id: i64) -> StoreResult<Option<Role>>;
    async fn create_role(&self, name: &str, description: &str) -> StoreResult<Role>;
    async fn delete_role(&self, id: i64) -> StoreResult<()>;

    async fn list_elements(&self) -> StoreResult<Vec<BusinessElement>>;
    async fn create_element(&self, name: &str, description: &str) -> StoreResult<BusinessElement>;
    async fn find_element_by_name(&self, name: &str) -> StoreResult<Option<BusinessElement>>;

    async fn list_rules(&self) -> StoreResult<Vec<AccessRoleRule>>;
    async fn get_rule(&self, role_id: i64, element_id: i64) -> StoreResult<Option<AccessRoleRule>>;
    async fn upsert_rule(
        &self,
        role_id: i64,
        element_id: i64,
        flags: PermissionFlags,
    ) -> StoreResult<AccessRoleRule>;
    async fn update_rule(&self, rule_id: i64, patch: RuleFlagsPatch) -> StoreResult<AccessRoleRule>;

    async fn open_session(&self, user_id: i64, token: &str, expires_at: i64)
        -> StoreResult<Session>;
    async fn close_session(&self, token: &str) -> StoreResult<()>;
    async fn close_all_sessions_for_user(&self, user_id: i64) -> StoreResult<()>;
    async fn session_usable(&self, token: &str) -> StoreResult<bool>;
    async fn sessions_for_user(&self, user_id: i64) -> StoreResult<Vec<Session>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
