//! Integration HTTP handlers.
//!
//! This module implements the integration endpoints:
//! - GET /integrations - List integrations (credential blobs omitted)
//! - GET /integrations/{id} - Get one integration (credential blob omitted)
//! - POST /integrations - Register provider credentials
//! - PATCH /integrations/{id} - Toggle or edit an integration
//! - DELETE /integrations/{id} - Remove an integration

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        credentials,
        integration::{
            CreateIntegrationRequest, Integration, IntegrationSummary, UpdateIntegrationRequest,
        },
    },
    services::integration_store::SharedStore,
};

/// List all integrations.
///
/// # Endpoint
///
/// `GET /integrations`
///
/// # Response
///
/// - **Success (200 OK)**: Array of integrations, newest first (may be empty)
/// - **Error (500)**: Store error
///
/// ```json
/// [
///   {
///     "id": "550e8400-e29b-41d4-a716-446655440000",
///     "name": "FNB Integration",
///     "type": "FNB",
///     "isActive": true,
///     "createdAt": "2026-10-16T10:00:00Z",
///     "updatedAt": "2026-10-16T10:00:00Z"
///   }
/// ]
/// ```
pub async fn list_integrations(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<IntegrationSummary>>, AppError> {
    let integrations = store.list_all().await?;

    Ok(Json(integrations))
}

/// Get a single integration by ID.
///
/// # Response
///
/// - **Success (200 OK)**: Integration summary
/// - **Error (404)**: Integration not found
pub async fn get_integration(
    State(store): State<SharedStore>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<IntegrationSummary>, AppError> {
    let Path(integration_id) = path?;
    let integration = store
        .find(integration_id)
        .await?
        .ok_or(AppError::IntegrationNotFound)?;

    Ok(Json(integration.into()))
}

/// Register a new integration.
///
/// # Endpoint
///
/// `POST /integrations`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "FNB Integration",
///   "type": "FNB",
///   "apiKey": "{\"clientId\":\"abc\",\"clientSecret\":\"xyz\",\"apiKey\":\"k\",\"environment\":\"sandbox\"}",
///   "isActive": true  // optional, defaults to true
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: The full created record, including `apiKey`
/// - **Error (400)**: Malformed body, or a credential blob that does not fit the provider's shape
/// - **Error (500)**: Store error
///
/// # Validation
///
/// For known providers (`FNB`, `XERO`) the blob is decoded and checked.
/// Any other `type` is stored without inspection.
pub async fn create_integration(
    State(store): State<SharedStore>,
    body: Result<Json<CreateIntegrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Integration>), AppError> {
    let Json(request) = body?;
    credentials::check_blob(&request.integration_type, &request.credential_blob)?;

    let integration = store.create(request.into()).await?;

    Ok((StatusCode::CREATED, Json(integration)))
}

/// Update an integration.
///
/// # Endpoint
///
/// `PATCH /integrations/{id}`
///
/// # Request Body
///
/// Any subset of `name`, `apiKey`, `isActive`:
///
/// ```json
/// { "isActive": false }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The updated record
/// - **Error (400)**: Empty name or invalid credential blob
/// - **Error (404)**: Integration not found
/// - **Error (500)**: Store error
pub async fn update_integration(
    State(store): State<SharedStore>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateIntegrationRequest>, JsonRejection>,
) -> Result<Json<Integration>, AppError> {
    let Path(integration_id) = path?;
    let Json(request) = body?;

    // Name and blob edits are checked against the stored record
    if request.name.is_some() || request.credential_blob.is_some() {
        let existing = store
            .find(integration_id)
            .await?
            .ok_or(AppError::IntegrationNotFound)?;

        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(AppError::InvalidRequest(
                    "name must not be empty".to_string(),
                ));
            }
        }

        // A replacement blob must fit the provider already stored on the record
        if let Some(blob) = &request.credential_blob {
            credentials::check_blob(&existing.integration_type, blob)?;
        }
    }

    let integration = store.update(integration_id, request.into()).await?;

    Ok(Json(integration))
}

/// Delete an integration permanently.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: Integration not found
/// - **Error (500)**: Store error
pub async fn delete_integration(
    State(store): State<SharedStore>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(integration_id) = path?;
    store.delete(integration_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
