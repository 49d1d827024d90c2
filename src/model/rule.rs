//! Access rule records and the permission flag block.
//!
//! # Purpose
//! Defines the (role, element) rule row and the seven capability flags the
//! permission evaluator reads.
use crate::auth::rbac::Action;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The seven independent capability flags carried by a rule.
///
/// All flags default to false; a missing rule and an all-false rule are
/// equivalent to callers.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionFlags {
    #[serde(default)]
    pub can_read: bool,
    #[serde(default)]
    pub can_create: bool,
    #[serde(default)]
    pub can_update: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub can_read_all: bool,
    #[serde(default)]
    pub can_update_all: bool,
    #[serde(default)]
    pub can_delete_all: bool,
}

impl PermissionFlags {
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.can_read,
            Action::Create => self.can_create,
            Action::Update => self.can_update,
            Action::Delete => self.can_delete,
            Action::ReadAll => self.can_read_all,
            Action::UpdateAll => self.can_update_all,
            Action::DeleteAll => self.can_delete_all,
        }
    }
}

/// One policy row: the flags a role holds on one business element.
/// (role_id, element_id) is unique; lookups are exact-match only.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AccessRoleRule {
    pub id: i64,
    pub role_id: i64,
    pub element_id: i64,
    #[serde(flatten)]
    pub flags: PermissionFlags,
}

/// Partial flag update; `None` fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema, Clone, Default)]
pub struct RuleFlagsPatch {
    pub can_read: Option<bool>,
    pub can_create: Option<bool>,
    pub can_update: Option<bool>,
    pub can_delete: Option<bool>,
    pub can_read_all: Option<bool>,
    pub can_update_all: Option<bool>,
    pub can_delete_all: Option<bool>,
}

impl RuleFlagsPatch {
    pub fn apply(&self, flags: &mut PermissionFlags) {
        if let Some(value) = self.can_read {
            flags.can_read = value;
        }
        if let Some(value) = self.can_create {
            flags.can_create = value;
        }
        if let Some(value) = self.can_update {
            flags.can_update = value;
        }
        if let Some(value) = self.can_delete {
            flags.can_delete = value;
        }
        if let Some(value) = self.can_read_all {
            flags.can_read_all = value;
        }
        if let Some(value) = self.can_update_all {
            flags.can_update_all = value;
        }
        if let Some(value) = self.can_delete_all {
            flags.can_delete_all = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_default_to_all_false() {
        let flags = PermissionFlags::default();
        for action in [
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::ReadAll,
            Action::UpdateAll,
            Action::DeleteAll,
        ] {
            assert!(!flags.allows(action));
        }
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let mut flags = PermissionFlags {
            can_read: true,
            ..PermissionFlags::default()
        };
        let patch = RuleFlagsPatch {
            can_update: Some(true),
            ..RuleFlagsPatch::default()
        };
        patch.apply(&mut flags);
        assert!(flags.can_read);
        assert!(flags.can_update);
        assert!(!flags.can_delete);
    }

    #[test]
    fn rule_serializes_flags_inline() {
        let rule = AccessRoleRule {
            id: 1,
            role_id: 2,
            element_id: 3,
            flags: PermissionFlags {
                can_read: true,
                ..PermissionFlags::default()
            },
        };
        let value = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(value["can_read"], serde_json::json!(true));
        assert_eq!(value["can_delete_all"], serde_json::json!(false));
        assert!(value.get("flags").is_none());
    }
}
