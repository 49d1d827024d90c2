//! Access-control data model module.
//!
//! # Purpose
//! Re-exports the user/role/element/rule/session records shared by the API and
//! store layers.
mod element;
mod role;
mod rule;
mod session;
mod user;

pub use element::BusinessElement;
pub use role::Role;
pub use rule::{AccessRoleRule, PermissionFlags, RuleFlagsPatch};
pub use session::Session;
pub use user::{NewUser, ProfilePatch, User};
