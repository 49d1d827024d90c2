//! Authgate service library crate.
//!
//! # Purpose
//! Exposes the HTTP API surface, auth helpers, configuration, and storage
//! implementations for use by the binary and tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
