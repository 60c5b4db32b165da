//! Session types shared across Campus services.
//!
//! Provides the opaque session-token format, cookie builders, and the
//! `presented_token` header lookup.

pub mod cookie;
pub mod identity;
pub mod token;
