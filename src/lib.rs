//! Integration Vault
//!
//! Registers third-party financial-service credentials (FNB banking, Xero
//! accounting) and manages them afterwards. The crate carries both halves:
//!
//! - **Server**: an Axum REST API over a single `integrations` table
//!   (`handlers`, `services`, `db`)
//! - **Client**: a typed HTTP client plus the view state for the provider
//!   forms and the integration list (`client`, `views`)
//!
//! Credential payloads are opaque to the store. Their provider-specific shape is
//! defined once in `models::credentials`.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod views;
