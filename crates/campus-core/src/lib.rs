//! Cross-cutting plumbing shared by Campus services: error envelope, health
//! probes, request middleware and tracing setup.

pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
