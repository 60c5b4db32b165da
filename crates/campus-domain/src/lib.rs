//! Domain types shared across all Campus services.
//!
//! This crate contains only pure types with no framework dependencies, so any
//! layer may use it. Mapping to columns and response bodies stays in the
//! service's `infra/` and `handlers/`.

pub mod account;
pub mod id;
