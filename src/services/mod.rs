//! Persistence services.
//!
//! Services hold the storage logic separated from HTTP handlers.

pub mod integration_store;
pub mod memory_store;
