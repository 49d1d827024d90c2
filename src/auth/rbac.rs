//! RBAC module wiring.
//!
//! # Purpose
//! Exposes the action vocabulary and the permission evaluator.
pub mod action;
pub mod evaluator;

pub use action::Action;
pub use evaluator::authorize;
