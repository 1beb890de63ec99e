//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Calls the integration store
//! 3. Returns HTTP response (JSON, status code)

use axum::{Router, routing::get};

use crate::services::integration_store::SharedStore;

/// Service health endpoint
pub mod health;
/// Integration management endpoints
pub mod integrations;

/// Build the application router over `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/integrations",
            get(integrations::list_integrations).post(integrations::create_integration),
        )
        .route(
            "/integrations/{id}",
            get(integrations::get_integration)
                .patch(integrations::update_integration)
                .delete(integrations::delete_integration),
        )
        .with_state(store)
}
