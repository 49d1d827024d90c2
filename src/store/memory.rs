//! In-memory implementation of the access store.
//!
//! # Purpose
//! Implements the `AccessStore` trait entirely in memory using `HashMap`s
//! guarded by `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: write locks serialize mutations, read
//!   locks allow concurrent reads.
//!
//! # Cascades
//! Deleting a role removes its rules and nulls `role_id` on users that
//! referenced it, by scanning. Fine for in-memory workloads; a durable
//! backend would use SQL constraints.
//!
//! # Sessions
//! Session rows are kept forever and revoked by flipping `is_active`.
//! Expired rows are answered by the usability check, not by eviction.
use super::{AccessStore, StoreError, StoreResult};
use crate::auth::token::now_epoch_seconds;
use crate::model::{
    AccessRoleRule, BusinessElement, NewUser, PermissionFlags, ProfilePatch, Role, RuleFlagsPatch,
    Session, User,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory access store.
///
/// Maps are wrapped in `Arc<RwLock<...>>` so the store can be shared across
/// async request handlers. Each entity type has its own id sequence.
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    roles: Arc<RwLock<HashMap<i64, Role>>>,
    elements: Arc<RwLock<HashMap<i64, BusinessElement>>>,
    /// Policy rows keyed by rule id; the (role_id, element_id) pair is kept
    /// unique by the mutation paths.
    rules: Arc<RwLock<HashMap<i64, AccessRoleRule>>>,
    /// Sessions keyed by token; tokens are unique per login.
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    next_user_id: AtomicI64,
    next_role_id: AtomicI64,
    next_element_id: AtomicI64,
    next_rule_id: AtomicI64,
    next_session_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            roles: Arc::new(RwLock::new(HashMap::new())),
            elements: Arc::new(RwLock::new(HashMap::new())),
            rules: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            next_user_id: AtomicI64::new(1),
            next_role_id: AtomicI64::new(1),
            next_element_id: AtomicI64::new(1),
            next_rule_id: AtomicI64::new(1),
            next_session_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[async_trait]
impl AccessStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| same_email(&u.email, &user.email)) {
            return Err(StoreError::Conflict("email exists".into()));
        }
        let now = now_epoch_seconds();
        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst);
        let record = User {
            id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            is_active: true,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            role_id: user.role_id,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, record.clone());
        Ok(record)
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_active_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.is_active && same_email(&u.email, email))
            .cloned())
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        // Deactivated accounts keep their email reserved.
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| same_email(&u.email, email)))
    }

    async fn update_profile(&self, user_id: i64, patch: ProfilePatch) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if let Some(email) = &patch.email {
            let taken = users
                .values()
                .any(|u| u.id != user_id && same_email(&u.email, email));
            if taken {
                return Err(StoreError::Conflict("email exists".into()));
            }
        }
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        user.updated_at = now_epoch_seconds();
        Ok(user.clone())
    }

    async fn deactivate_user(&self, user_id: i64) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user.is_active = false;
        user.updated_at = now_epoch_seconds();
        Ok(())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let mut roles: Vec<_> = self.roles.read().await.values().cloned().collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles)
    }

    async fn find_role(&self, id: i64) -> StoreResult<Option<Role>> {
        Ok(self.roles.read().await.get(&id).cloned())
    }

    async fn create_role(&self, name: &str, description: &str) -> StoreResult<Role> {
        let mut roles = self.roles.write().await;
        if roles.values().any(|r| r.name == name) {
            return Err(StoreError::Conflict("role exists".into()));
        }
        let id = self.next_role_id.fetch_add(1, Ordering::SeqCst);
        let role = Role {
            id,
            name: name.to_string(),
            description: description.to_string(),
        };
        roles.insert(id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, id: i64) -> StoreResult<()> {
        let mut roles = self.roles.write().await;
        if roles.remove(&id).is_none() {
            return Err(StoreError::NotFound("role".into()));
        }
        drop(roles);
        // Cascade: drop the role's rules and unassign referencing users.
        self.rules.write().await.retain(|_, rule| rule.role_id != id);
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            if user.role_id == Some(id) {
                user.role_id = None;
            }
        }
        Ok(())
    }

    async fn list_elements(&self) -> StoreResult<Vec<BusinessElement>> {
        let mut elements: Vec<_> = self.elements.read().await.values().cloned().collect();
        elements.sort_by_key(|e| e.id);
        Ok(elements)
    }

    async fn create_element(&self, name: &str, description: &str) -> StoreResult<BusinessElement> {
        let mut elements = self.elements.write().await;
        if elements.values().any(|e| e.name == name) {
            return Err(StoreError::Conflict("element exists".into()));
        }
        let id = self.next_element_id.fetch_add(1, Ordering::SeqCst);
        let element = BusinessElement {
            id,
            name: name.to_string(),
            description: description.to_string(),
        };
        elements.insert(id, element.clone());
        Ok(element)
    }

    async fn find_element_by_name(&self, name: &str) -> StoreResult<Option<BusinessElement>> {
        Ok(self
            .elements
            .read()
            .await
            .values()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn list_rules(&self) -> StoreResult<Vec<AccessRoleRule>> {
        let mut rules: Vec<_> = self.rules.read().await.values().cloned().collect();
        rules.sort_by_key(|r| r.id);
        Ok(rules)
    }

    async fn get_rule(&self, role_id: i64, element_id: i64) -> StoreResult<Option<AccessRoleRule>> {
        Ok(self
            .rules
            .read()
            .await
            .values()
            .find(|r| r.role_id == role_id && r.element_id == element_id)
            .cloned())
    }

    async fn upsert_rule(
        &self,
        role_id: i64,
        element_id: i64,
        flags: PermissionFlags,
    ) -> StoreResult<AccessRoleRule> {
        if !self.roles.read().await.contains_key(&role_id) {
            return Err(StoreError::NotFound("role".into()));
        }
        if !self.elements.read().await.contains_key(&element_id) {
            return Err(StoreError::NotFound("element".into()));
        }
        let mut rules = self.rules.write().await;
        if let Some(existing) = rules
            .values_mut()
            .find(|r| r.role_id == role_id && r.element_id == element_id)
        {
            existing.flags = flags;
            return Ok(existing.clone());
        }
        let id = self.next_rule_id.fetch_add(1, Ordering::SeqCst);
        let rule = AccessRoleRule {
            id,
            role_id,
            element_id,
            flags,
        };
        rules.insert(id, rule.clone());
        Ok(rule)
    }

    async fn update_rule(&self, rule_id: i64, patch: RuleFlagsPatch) -> StoreResult<AccessRoleRule> {
        let mut rules = self.rules.write().await;
        let rule = rules
            .get_mut(&rule_id)
            .ok_or_else(|| StoreError::NotFound("rule".into()))?;
        patch.apply(&mut rule.flags);
        Ok(rule.clone())
    }

    async fn open_session(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> StoreResult<Session> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(token) {
            return Err(StoreError::Conflict("session token exists".into()));
        }
        let id = self.next_session_id.fetch_add(1, Ordering::SeqCst);
        let session = Session {
            id,
            user_id,
            token: token.to_string(),
            created_at: now_epoch_seconds(),
            expires_at,
            is_active: true,
        };
        sessions.insert(token.to_string(), session.clone());
        Ok(session)
    }

    async fn close_session(&self, token: &str) -> StoreResult<()> {
        // Idempotent: unknown and already-closed tokens are a no-op.
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.is_active = false;
        }
        Ok(())
    }

    async fn close_all_sessions_for_user(&self, user_id: i64) -> StoreResult<()> {
        let mut sessions = self.sessions.write().await;
        for session in sessions.values_mut() {
            if session.user_id == user_id {
                session.is_active = false;
            }
        }
        Ok(())
    }

    async fn session_usable(&self, token: &str) -> StoreResult<bool> {
        let now = now_epoch_seconds();
        Ok(self
            .sessions
            .read()
            .await
            .get(token)
            .map(|s| s.is_usable(now))
            .unwrap_or(false))
    }

    async fn sessions_for_user(&self, user_id: i64) -> StoreResult<Vec<Session>> {
        let mut sessions: Vec<_> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.id);
        Ok(sessions)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "hash".to_string(),
            is_staff: false,
            is_superuser: false,
            role_id: None,
        }
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        store.create_user(new_user("a@example.com")).await.expect("create");
        let err = store
            .create_user(new_user("A@Example.com"))
            .await
            .err()
            .expect("duplicate");
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn deactivated_user_keeps_email_reserved_but_cannot_login() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.expect("create");
        store.deactivate_user(user.id).await.expect("deactivate");
        assert!(store.email_taken("a@example.com").await.expect("taken"));
        assert!(store
            .find_active_user_by_email("a@example.com")
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn update_profile_rejects_email_owned_by_another_user() {
        let store = InMemoryStore::new();
        let first = store.create_user(new_user("a@example.com")).await.expect("a");
        store.create_user(new_user("b@example.com")).await.expect("b");
        let err = store
            .update_profile(
                first.id,
                ProfilePatch {
                    email: Some("b@example.com".to_string()),
                    ..ProfilePatch::default()
                },
            )
            .await
            .err()
            .expect("conflict");
        assert!(matches!(err, StoreError::Conflict(_)));

        // Keeping your own email is fine.
        let updated = store
            .update_profile(
                first.id,
                ProfilePatch {
                    email: Some("a@example.com".to_string()),
                    first_name: Some("New".to_string()),
                    ..ProfilePatch::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.first_name, "New");
    }

    #[tokio::test]
    async fn role_delete_cascades_rules_and_user_refs() {
        let store = InMemoryStore::new();
        let role = store.create_role("manager", "").await.expect("role");
        let element = store.create_element("products", "").await.expect("element");
        store
            .upsert_rule(role.id, element.id, PermissionFlags::default())
            .await
            .expect("rule");
        let mut user = new_user("a@example.com");
        user.role_id = Some(role.id);
        let user = store.create_user(user).await.expect("user");

        store.delete_role(role.id).await.expect("delete");

        assert!(store.find_role(role.id).await.expect("find").is_none());
        assert!(store.list_rules().await.expect("rules").is_empty());
        let user = store.find_user(user.id).await.expect("find").expect("user");
        assert_eq!(user.role_id, None);
    }

    #[tokio::test]
    async fn upsert_rule_replaces_flags_and_keeps_id() {
        let store = InMemoryStore::new();
        let role = store.create_role("manager", "").await.expect("role");
        let element = store.create_element("products", "").await.expect("element");
        let created = store
            .upsert_rule(
                role.id,
                element.id,
                PermissionFlags {
                    can_read: true,
                    ..PermissionFlags::default()
                },
            )
            .await
            .expect("create");
        let replaced = store
            .upsert_rule(
                role.id,
                element.id,
                PermissionFlags {
                    can_delete: true,
                    ..PermissionFlags::default()
                },
            )
            .await
            .expect("replace");
        assert_eq!(created.id, replaced.id);
        assert!(!replaced.flags.can_read);
        assert!(replaced.flags.can_delete);
        assert_eq!(store.list_rules().await.expect("rules").len(), 1);
    }

    #[tokio::test]
    async fn upsert_rule_requires_existing_role_and_element() {
        let store = InMemoryStore::new();
        let role = store.create_role("manager", "").await.expect("role");
        let err = store
            .upsert_rule(role.id, 999, PermissionFlags::default())
            .await
            .err()
            .expect("missing element");
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = store
            .upsert_rule(999, 1, PermissionFlags::default())
            .await
            .err()
            .expect("missing role");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_rule_unknown_id_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .update_rule(77, RuleFlagsPatch::default())
            .await
            .err()
            .expect("missing rule");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn close_session_is_idempotent() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.expect("user");
        let future = now_epoch_seconds() + 3600;
        store
            .open_session(user.id, "token-1", future)
            .await
            .expect("open");
        assert!(store.session_usable("token-1").await.expect("usable"));

        store.close_session("token-1").await.expect("close");
        assert!(!store.session_usable("token-1").await.expect("usable"));
        store.close_session("token-1").await.expect("close again");
        store.close_session("never-issued").await.expect("unknown");
    }

    #[tokio::test]
    async fn expired_session_is_not_usable() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.expect("user");
        store
            .open_session(user.id, "stale", now_epoch_seconds() - 1)
            .await
            .expect("open");
        assert!(!store.session_usable("stale").await.expect("usable"));
    }

    #[tokio::test]
    async fn close_all_only_touches_one_users_sessions() {
        let store = InMemoryStore::new();
        let alice = store.create_user(new_user("a@example.com")).await.expect("a");
        let bob = store.create_user(new_user("b@example.com")).await.expect("b");
        let future = now_epoch_seconds() + 3600;
        store.open_session(alice.id, "a-1", future).await.expect("open");
        store.open_session(alice.id, "a-2", future).await.expect("open");
        store.open_session(bob.id, "b-1", future).await.expect("open");

        store
            .close_all_sessions_for_user(alice.id)
            .await
            .expect("close all");

        assert!(!store.session_usable("a-1").await.expect("usable"));
        assert!(!store.session_usable("a-2").await.expect("usable"));
        assert!(store.session_usable("b-1").await.expect("usable"));
        let rows = store.sessions_for_user(alice.id).await.expect("rows");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_session_token_conflicts() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.expect("user");
        let future = now_epoch_seconds() + 3600;
        store.open_session(user.id, "dup", future).await.expect("open");
        let err = store
            .open_session(user.id, "dup", future)
            .await
            .err()
            .expect("conflict");
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
