//! Data models representing database entities and wire payloads.

/// Typed provider credential payloads
pub mod credentials;
/// Integration record model
pub mod integration;
