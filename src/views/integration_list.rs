//! Integration list view.
//!
//! Loads every integration once, then keeps its local rows in step with the
//! toggle and delete calls it makes. A toggle replaces the row with the record
//! the server returned.
//!
//! Toggle and delete are split into `begin_*` and `finish_*` steps around the
//! request. While a row has a request in flight, further actions on it are
//! ignored.

use std::{collections::HashSet, fmt};

use uuid::Uuid;

use crate::{
    client::{ClientError, IntegrationsClient},
    models::integration::{Integration, IntegrationSummary, UpdateIntegrationRequest},
    views::Notice,
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this integration?";

/// Page-level state of the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Failed(String),
    Loaded(Vec<IntegrationSummary>),
}

#[derive(Debug, Clone)]
pub struct IntegrationListView {
    state: ListState,
    notice: Option<Notice>,
    in_flight: HashSet<Uuid>,
}

impl Default for IntegrationListView {
    fn default() -> Self {
        Self {
            state: ListState::Loading,
            notice: None,
            in_flight: HashSet::new(),
        }
    }
}

impl IntegrationListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Loaded rows; empty while loading or after a failed load.
    pub fn integrations(&self) -> &[IntegrationSummary] {
        match &self.state {
            ListState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&IntegrationSummary> {
        self.integrations().iter().find(|row| row.id == id)
    }

    /// Whether actions on `id` are currently disabled.
    pub fn is_busy(&self, id: Uuid) -> bool {
        self.in_flight.contains(&id)
    }

    /// Fetch the full list, replacing whatever was shown.
    pub async fn load(&mut self, client: &IntegrationsClient) {
        self.state = ListState::Loading;
        self.state = match client.list().await {
            Ok(rows) => ListState::Loaded(rows),
            Err(err) => {
                tracing::warn!(error = %err, "loading integrations failed");
                ListState::Failed(load_error_text(&err).to_string())
            }
        };
    }

    /// Mark `id` in flight and build the request that flips its active flag.
    ///
    /// Returns `None` when the row is unknown or already busy.
    pub fn begin_toggle(&mut self, id: Uuid) -> Option<UpdateIntegrationRequest> {
        let current = self.get(id)?.is_active;
        if !self.in_flight.insert(id) {
            return None;
        }
        self.notice = None;
        Some(UpdateIntegrationRequest::set_active(!current))
    }

    /// Record the outcome of the update started by `begin_toggle`.
    pub fn finish_toggle(&mut self, id: Uuid, result: &Result<Integration, ClientError>) {
        self.in_flight.remove(&id);
        match result {
            Ok(updated) => self.replace_row(updated.clone().into()),
            Err(err) if err.is_not_found() => self.drop_stale_row(id),
            Err(err) => {
                tracing::warn!(
                    integration_id = %id,
                    error = %err,
                    "updating integration status failed"
                );
                self.notice = Some(Notice::error("Failed to update integration status"));
            }
        }
    }

    /// Flip the active flag of `id`.
    pub async fn toggle_active(&mut self, client: &IntegrationsClient, id: Uuid) {
        let Some(request) = self.begin_toggle(id) else {
            return;
        };
        let result = client.update(id, &request).await;
        self.finish_toggle(id, &result);
    }

    /// Ask `confirm` about deleting `id` and mark it in flight if accepted.
    ///
    /// `confirm` is not consulted for unknown or busy rows.
    pub fn begin_delete<C>(&mut self, id: Uuid, confirm: C) -> bool
    where
        C: FnOnce(&str, &IntegrationSummary) -> bool,
    {
        if self.is_busy(id) {
            return false;
        }
        let Some(row) = self.get(id) else {
            return false;
        };
        if !confirm(DELETE_PROMPT, row) {
            return false;
        }
        self.in_flight.insert(id);
        self.notice = None;
        true
    }

    /// Record the outcome of the delete started by `begin_delete`.
    ///
    /// Returns `true` when the record was removed.
    pub fn finish_delete(&mut self, id: Uuid, result: &Result<(), ClientError>) -> bool {
        self.in_flight.remove(&id);
        match result {
            Ok(()) => {
                self.remove_row(id);
                true
            }
            Err(err) if err.is_not_found() => {
                self.drop_stale_row(id);
                false
            }
            Err(err) => {
                tracing::warn!(integration_id = %id, error = %err, "deleting integration failed");
                self.notice = Some(Notice::error("Failed to delete integration"));
                false
            }
        }
    }

    /// Delete `id` after `confirm` accepts the prompt for that row.
    ///
    /// Returns `true` when the record was removed.
    pub async fn delete<C>(&mut self, client: &IntegrationsClient, id: Uuid, confirm: C) -> bool
    where
        C: FnOnce(&str, &IntegrationSummary) -> bool,
    {
        if !self.begin_delete(id, confirm) {
            return false;
        }
        let result = client.delete(id).await;
        self.finish_delete(id, &result)
    }

    /// Acknowledge an edit request. Editing in place is not supported yet.
    pub fn edit(&mut self, id: Uuid) {
        if let Some(row) = self.get(id) {
            self.notice = Some(Notice::info(format!(
                "Edit integration: {} ({})",
                row.name, row.integration_type
            )));
        }
    }

    fn replace_row(&mut self, updated: IntegrationSummary) {
        if let ListState::Loaded(rows) = &mut self.state {
            if let Some(row) = rows.iter_mut().find(|row| row.id == updated.id) {
                *row = updated;
            }
        }
    }

    fn drop_stale_row(&mut self, id: Uuid) {
        self.remove_row(id);
        self.notice = Some(Notice::error("Integration no longer exists"));
    }

    fn remove_row(&mut self, id: Uuid) {
        if let ListState::Loaded(rows) = &mut self.state {
            rows.retain(|row| row.id != id);
        }
    }
}

fn load_error_text(err: &ClientError) -> &'static str {
    match err {
        ClientError::Api { .. } | ClientError::Decode { .. } => "Failed to fetch integrations",
        ClientError::Network(_) | ClientError::BaseUrl(_) => "Network error occurred",
    }
}

impl fmt::Display for IntegrationListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Existing Integrations")?;
        if let Some(notice) = &self.notice {
            writeln!(f, "{notice}")?;
        }
        match &self.state {
            ListState::Loading => write!(f, "Loading integrations..."),
            ListState::Failed(message) => write!(f, "{message}"),
            ListState::Loaded(rows) if rows.is_empty() => write!(f, "No integrations found"),
            ListState::Loaded(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{} | Type: {} | {} | Created: {}",
                        row.name,
                        row.integration_type,
                        if row.is_active { "Active" } else { "Inactive" },
                        row.created_at.format("%Y-%m-%d")
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;

    fn row(name: &str, integration_type: &str, is_active: bool) -> IntegrationSummary {
        let created = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        IntegrationSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            integration_type: integration_type.to_string(),
            is_active,
            created_at: created,
            updated_at: created,
        }
    }

    fn loaded(rows: Vec<IntegrationSummary>) -> IntegrationListView {
        IntegrationListView {
            state: ListState::Loaded(rows),
            ..IntegrationListView::default()
        }
    }

    #[test]
    fn renders_each_state() {
        let view = IntegrationListView::new();
        assert!(view.to_string().ends_with("Loading integrations..."));

        let view = IntegrationListView {
            state: ListState::Failed("Failed to fetch integrations".to_string()),
            ..IntegrationListView::default()
        };
        assert!(view.to_string().ends_with("Failed to fetch integrations"));

        assert!(loaded(vec![]).to_string().ends_with("No integrations found"));

        let view = loaded(vec![
            row("FNB Integration", "FNB", true),
            row("Xero Integration", "XERO", false),
        ]);
        let rendered = view.to_string();
        assert!(rendered.contains("FNB Integration | Type: FNB | Active | Created: 2026-10-16"));
        assert!(rendered.contains("Xero Integration | Type: XERO | Inactive"));
    }

    fn server_error() -> ClientError {
        ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: Some("An internal error occurred".to_string()),
        }
    }

    fn full(summary: &IntegrationSummary, is_active: bool) -> Integration {
        Integration {
            id: summary.id,
            name: summary.name.clone(),
            integration_type: summary.integration_type.clone(),
            credential_blob: "{}".to_string(),
            is_active,
            created_at: summary.created_at,
            updated_at: summary.created_at + chrono::Duration::seconds(1),
        }
    }

    #[test]
    fn busy_rows_ignore_further_actions() {
        let fnb = row("FNB Integration", "FNB", true);
        let id = fnb.id;
        let mut view = loaded(vec![fnb.clone()]);

        let request = view.begin_toggle(id).unwrap();
        assert_eq!(request.is_active, Some(false));
        assert!(view.is_busy(id));

        assert!(view.begin_toggle(id).is_none());
        let mut asked = false;
        assert!(!view.begin_delete(id, |_, _| {
            asked = true;
            true
        }));
        assert!(!asked);

        view.finish_toggle(id, &Ok(full(&fnb, false)));
        assert!(!view.is_busy(id));
        assert!(!view.get(id).unwrap().is_active);
        assert!(view.begin_toggle(id).is_some());
    }

    #[test]
    fn unknown_rows_are_ignored() {
        let mut view = loaded(vec![]);
        let id = Uuid::new_v4();

        assert!(view.begin_toggle(id).is_none());
        assert!(!view.begin_delete(id, |_, _| true));
        assert!(!view.is_busy(id));
    }

    #[test]
    fn failed_mutations_keep_row_and_show_notice() {
        let fnb = row("FNB Integration", "FNB", true);
        let id = fnb.id;
        let mut view = loaded(vec![fnb.clone()]);

        view.begin_toggle(id).unwrap();
        view.finish_toggle(id, &Err(server_error()));
        assert_eq!(
            view.notice(),
            Some(&Notice::error("Failed to update integration status"))
        );
        assert_eq!(view.integrations(), &[fnb.clone()]);

        assert!(view.begin_delete(id, |_, _| true));
        assert!(view.notice().is_none());
        assert!(!view.finish_delete(id, &Err(server_error())));
        assert_eq!(
            view.notice(),
            Some(&Notice::error("Failed to delete integration"))
        );
        assert_eq!(view.integrations(), &[fnb]);
        assert!(!view.is_busy(id));
    }

    #[test]
    fn edit_is_acknowledged_only() {
        let fnb = row("FNB Integration", "FNB", true);
        let id = fnb.id;
        let mut view = loaded(vec![fnb.clone()]);

        view.edit(id);

        assert_eq!(
            view.notice(),
            Some(&Notice::info("Edit integration: FNB Integration (FNB)"))
        );
        assert_eq!(view.integrations(), &[fnb]);
    }

    #[test]
    fn replace_and_remove_touch_one_row() {
        let fnb = row("FNB Integration", "FNB", true);
        let xero = row("Xero Integration", "XERO", true);
        let mut view = loaded(vec![fnb.clone(), xero.clone()]);

        let mut flipped = fnb.clone();
        flipped.is_active = false;
        view.replace_row(flipped.clone());
        assert_eq!(view.integrations(), &[flipped, xero.clone()]);

        view.remove_row(fnb.id);
        assert_eq!(view.integrations(), &[xero]);
    }
}
