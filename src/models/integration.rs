//! Integration data models and API request/response types.
//!
//! This module defines:
//! - `Integration`: Database entity representing a stored provider credential set
//! - `IntegrationSummary`: Listing projection that never carries the credential blob
//! - `CreateIntegrationRequest` / `UpdateIntegrationRequest`: Request bodies
//! - `NewIntegration` / `IntegrationChanges`: Store-level inputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an integration record from the database.
///
/// # Database Table
///
/// Maps to the `integrations` table. Each integration:
/// - Is tagged with a provider discriminator (`FNB`, `XERO`, ...)
/// - Carries an opaque credential blob the store never inspects
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "FNB Integration",
///   "type": "FNB",
///   "apiKey": "{\"clientId\":\"abc\",...}",
///   "isActive": true,
///   "createdAt": "2026-10-16T10:00:00Z",
///   "updatedAt": "2026-10-16T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// Unique identifier for this integration
    pub id: Uuid,

    /// Human-readable label
    pub name: String,

    /// Provider discriminator
    #[serde(rename = "type")]
    pub integration_type: String,

    /// Serialized provider credentials
    ///
    /// Exposed on the wire as `apiKey`, stored in the `api_key` column.
    #[serde(rename = "apiKey")]
    #[sqlx(rename = "api_key")]
    pub credential_blob: String,

    /// Whether the integration is enabled
    pub is_active: bool,

    /// Timestamp when the integration was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last modification
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of an integration.
///
/// Returned by list and get endpoints. The credential blob is never included.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub integration_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Drop the credential blob from a full record.
impl From<Integration> for IntegrationSummary {
    fn from(integration: Integration) -> Self {
        Self {
            id: integration.id,
            name: integration.name,
            integration_type: integration.integration_type,
            is_active: integration.is_active,
            created_at: integration.created_at,
            updated_at: integration.updated_at,
        }
    }
}

/// Request body for creating an integration.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "FNB Integration",
///   "type": "FNB",
///   "apiKey": "{\"clientId\":\"abc\",\"clientSecret\":\"xyz\",...}",
///   "isActive": true
/// }
/// ```
///
/// # Validation
///
/// - `isActive`: Optional, defaults to `true`
/// - `apiKey`: Checked against the provider shape when `type` is a known provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntegrationRequest {
    pub name: String,

    #[serde(rename = "type")]
    pub integration_type: String,

    #[serde(rename = "apiKey")]
    pub credential_blob: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Partial update body. Absent fields are left untouched.
///
/// # JSON Example
///
/// ```json
/// { "isActive": false }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntegrationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "apiKey", skip_serializing_if = "Option::is_none")]
    pub credential_blob: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateIntegrationRequest {
    /// Body that only flips the active flag.
    pub fn set_active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }
}

/// Fields the store needs to insert a new integration.
#[derive(Debug, Clone)]
pub struct NewIntegration {
    pub name: String,
    pub integration_type: String,
    pub credential_blob: String,
    pub is_active: bool,
}

impl From<CreateIntegrationRequest> for NewIntegration {
    fn from(request: CreateIntegrationRequest) -> Self {
        Self {
            name: request.name,
            integration_type: request.integration_type,
            credential_blob: request.credential_blob,
            is_active: request.is_active.unwrap_or(true),
        }
    }
}

/// Store-level partial update.
#[derive(Debug, Clone, Default)]
pub struct IntegrationChanges {
    pub name: Option<String>,
    pub credential_blob: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateIntegrationRequest> for IntegrationChanges {
    fn from(request: UpdateIntegrationRequest) -> Self {
        Self {
            name: request.name,
            credential_blob: request.credential_blob,
            is_active: request.is_active,
        }
    }
}
