//! Authentication and authorization modules.
//!
//! # Purpose
//! Groups password hashing, session token minting/validation, request
//! identity resolution, and the RBAC permission evaluator.
pub mod identity;
pub mod password;
pub mod rbac;
pub mod token;
