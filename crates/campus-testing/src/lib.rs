//! Test utilities for Campus services.
//!
//! Import from `[dev-dependencies]` only, never from production code.

pub mod auth;
