//! Process-local integration store.
//!
//! Backs the server when `STORE_BACKEND=memory` and every handler test.
//! Records live in a map behind a tokio `RwLock`; each call holds the lock for
//! its whole single-record operation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::integration::{Integration, IntegrationChanges, IntegrationSummary, NewIntegration},
    services::integration_store::IntegrationStore,
};

#[derive(Debug, Default)]
pub struct MemoryIntegrationStore {
    records: RwLock<HashMap<Uuid, Integration>>,
}

impl MemoryIntegrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Next `updated_at` value, strictly after `previous`.
///
/// Postgres keeps microseconds, so the same resolution is used here.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

#[async_trait]
impl IntegrationStore for MemoryIntegrationStore {
    async fn list_all(&self) -> Result<Vec<IntegrationSummary>, AppError> {
        let records = self.records.read().await;
        let mut summaries: Vec<IntegrationSummary> =
            records.values().cloned().map(Into::into).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Integration>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewIntegration) -> Result<Integration, AppError> {
        let now = Utc::now();
        let integration = Integration {
            id: Uuid::new_v4(),
            name: new.name,
            integration_type: new.integration_type,
            credential_blob: new.credential_blob,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };

        self.records
            .write()
            .await
            .insert(integration.id, integration.clone());

        tracing::debug!(integration_id = %integration.id, "integration created in memory");
        Ok(integration)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: IntegrationChanges,
    ) -> Result<Integration, AppError> {
        let mut records = self.records.write().await;
        let integration = records.get_mut(&id).ok_or(AppError::IntegrationNotFound)?;

        if let Some(name) = changes.name {
            integration.name = name;
        }
        if let Some(blob) = changes.credential_blob {
            integration.credential_blob = blob;
        }
        if let Some(is_active) = changes.is_active {
            integration.is_active = is_active;
        }
        integration.updated_at = advance(integration.updated_at);

        Ok(integration.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::IntegrationNotFound)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_integration(name: &str) -> NewIntegration {
        NewIntegration {
            name: name.to_string(),
            integration_type: "FNB".to_string(),
            credential_blob: "{\"clientId\":\"abc\"}".to_string(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn create_then_list_projects_fields() {
        let store = MemoryIntegrationStore::new();
        let created = store.create(new_integration("FNB Integration")).await.unwrap();

        assert_eq!(created.created_at, created.updated_at);

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed, vec![IntegrationSummary::from(created)]);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryIntegrationStore::new();
        let first = store.create(new_integration("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = store.create(new_integration("second")).await.unwrap();

        let ids: Vec<Uuid> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn update_applies_partial_changes() {
        let store = MemoryIntegrationStore::new();
        let created = store.create(new_integration("FNB Integration")).await.unwrap();

        let updated = store
            .update(
                created.id,
                IntegrationChanges {
                    is_active: Some(false),
                    ..IntegrationChanges::default()
                },
            )
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.credential_blob, created.credential_blob);
        assert!(updated.updated_at > updated.created_at);

        let again = store
            .update(created.id, IntegrationChanges::default())
            .await
            .unwrap();
        assert!(again.updated_at > updated.updated_at);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = MemoryIntegrationStore::new();
        let id = Uuid::new_v4();

        assert!(matches!(
            store.update(id, IntegrationChanges::default()).await,
            Err(AppError::IntegrationNotFound)
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(AppError::IntegrationNotFound)
        ));
        assert!(store.find(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let store = MemoryIntegrationStore::new();
        let created = store.create(new_integration("FNB Integration")).await.unwrap();

        store.delete(created.id).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
        assert!(matches!(
            store.delete(created.id).await,
            Err(AppError::IntegrationNotFound)
        ));
    }
}
