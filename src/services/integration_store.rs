//! Integration store - persistence for integration records.
//!
//! This service handles:
//! - Listing integrations without their credential blobs
//! - Creating, updating and deleting single records
//!
//! The store treats the credential blob as an opaque string. Provider-specific
//! checks live at the API boundary, so provider field changes never touch this module.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::integration::{Integration, IntegrationChanges, IntegrationSummary, NewIntegration},
};

/// Store shared by every handler through axum state.
pub type SharedStore = Arc<dyn IntegrationStore>;

/// Persistence operations over integration records.
///
/// Every call touches a single record; there are no multi-record transactions.
#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// All integrations, newest first, without credential blobs.
    async fn list_all(&self) -> Result<Vec<IntegrationSummary>, AppError>;

    /// Full record lookup.
    async fn find(&self, id: Uuid) -> Result<Option<Integration>, AppError>;

    /// Insert a new record. The store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, new: NewIntegration) -> Result<Integration, AppError>;

    /// Apply the present fields of `changes` and advance `updated_at`.
    ///
    /// # Errors
    ///
    /// - `IntegrationNotFound`: No record with this id
    async fn update(&self, id: Uuid, changes: IntegrationChanges)
    -> Result<Integration, AppError>;

    /// Remove a record permanently.
    ///
    /// # Errors
    ///
    /// - `IntegrationNotFound`: No record with this id
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Verify the backing storage is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// PostgreSQL-backed store.
///
/// # Database Table
///
/// Uses the `integrations` table created by the migrations in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgIntegrationStore {
    pool: DbPool,
}

impl PgIntegrationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntegrationStore for PgIntegrationStore {
    async fn list_all(&self) -> Result<Vec<IntegrationSummary>, AppError> {
        // Projection never selects api_key
        let integrations = sqlx::query_as::<_, IntegrationSummary>(
            r#"
            SELECT id, name, integration_type, is_active, created_at, updated_at
            FROM integrations
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(integrations)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Integration>, AppError> {
        let integration = sqlx::query_as::<_, Integration>(
            r#"
            SELECT id, name, integration_type, api_key, is_active, created_at, updated_at
            FROM integrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(integration)
    }

    async fn create(&self, new: NewIntegration) -> Result<Integration, AppError> {
        let integration = sqlx::query_as::<_, Integration>(
            r#"
            INSERT INTO integrations (name, integration_type, api_key, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, integration_type, api_key, is_active, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.integration_type)
        .bind(&new.credential_blob)
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            integration_id = %integration.id,
            integration_type = %integration.integration_type,
            "integration created"
        );

        Ok(integration)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: IntegrationChanges,
    ) -> Result<Integration, AppError> {
        // COALESCE keeps columns whose change is NULL. updated_at moves forward
        // even when two updates land within the same transaction timestamp.
        let integration = sqlx::query_as::<_, Integration>(
            r#"
            UPDATE integrations
            SET name = COALESCE($2, name),
                api_key = COALESCE($3, api_key),
                is_active = COALESCE($4, is_active),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING id, name, integration_type, api_key, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.credential_blob)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::IntegrationNotFound)?;

        tracing::info!(
            integration_id = %integration.id,
            is_active = integration.is_active,
            "integration updated"
        );

        Ok(integration)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM integrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::IntegrationNotFound);
        }

        tracing::info!(integration_id = %id, "integration deleted");
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
