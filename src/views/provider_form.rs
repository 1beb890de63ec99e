//! Provider credential form.
//!
//! One parameterized form serves every provider. The provider's typed
//! credential struct doubles as the form's field state, so the same value that
//! the operator edits is what gets encoded into the credential blob.
//!
//! # Submission Flow
//!
//! 1. `begin_submit` packs the fields into a create request and marks the form in flight
//! 2. The caller sends the request (or `submit` does it with an [`IntegrationsClient`])
//! 3. `finish_submit` records the outcome: success resets the fields, failure keeps them

use std::fmt;

use crate::{
    client::{ClientError, IntegrationsClient},
    models::{
        credentials::{
            CredentialPayload, FnbCredentials, FnbEnvironment, ProviderKind, XeroCredentials,
        },
        integration::{CreateIntegrationRequest, Integration},
    },
    views::Notice,
};

/// Provider field sets usable as form state.
pub trait ProviderFields: Clone + Default + Into<CredentialPayload> {
    const PROVIDER: ProviderKind;

    /// Single-field edit message.
    type Field;

    fn apply(&mut self, edit: Self::Field);
}

/// Edits accepted by the FNB form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FnbField {
    ClientId(String),
    ClientSecret(String),
    ApiKey(String),
    Environment(FnbEnvironment),
    WebhookUrl(String),
    Description(String),
}

impl ProviderFields for FnbCredentials {
    const PROVIDER: ProviderKind = ProviderKind::Fnb;

    type Field = FnbField;

    fn apply(&mut self, edit: FnbField) {
        match edit {
            FnbField::ClientId(value) => self.client_id = value,
            FnbField::ClientSecret(value) => self.client_secret = value,
            FnbField::ApiKey(value) => self.api_key = value,
            FnbField::Environment(value) => self.environment = value,
            FnbField::WebhookUrl(value) => self.webhook_url = non_empty(value),
            FnbField::Description(value) => self.description = non_empty(value),
        }
    }
}

/// Edits accepted by the Xero form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XeroField {
    ClientId(String),
    ClientSecret(String),
    RedirectUri(String),
    Scopes(String),
    WebhookUrl(String),
    Description(String),
}

impl ProviderFields for XeroCredentials {
    const PROVIDER: ProviderKind = ProviderKind::Xero;

    type Field = XeroField;

    fn apply(&mut self, edit: XeroField) {
        match edit {
            XeroField::ClientId(value) => self.client_id = value,
            XeroField::ClientSecret(value) => self.client_secret = value,
            XeroField::RedirectUri(value) => self.redirect_uri = value,
            XeroField::Scopes(value) => self.scopes = value,
            XeroField::WebhookUrl(value) => self.webhook_url = non_empty(value),
            XeroField::Description(value) => self.description = non_empty(value),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Messages driving [`ProviderForm::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMsg<E> {
    Edit(E),
    SetActive(bool),
}

/// Form state for one provider.
#[derive(Debug, Clone)]
pub struct ProviderForm<F: ProviderFields> {
    fields: F,
    is_active: bool,
    submitting: bool,
    notice: Option<Notice>,
}

pub type FnbForm = ProviderForm<FnbCredentials>;
pub type XeroForm = ProviderForm<XeroCredentials>;

impl<F: ProviderFields> Default for ProviderForm<F> {
    fn default() -> Self {
        Self {
            fields: F::default(),
            is_active: true,
            submitting: false,
            notice: None,
        }
    }
}

impl<F: ProviderFields> ProviderForm<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(&self) -> ProviderKind {
        F::PROVIDER
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn update(&mut self, msg: FormMsg<F::Field>) {
        match msg {
            FormMsg::Edit(edit) => self.fields.apply(edit),
            FormMsg::SetActive(is_active) => self.is_active = is_active,
        }
    }

    /// Build the create request and mark the form in flight.
    ///
    /// Returns `None` while a previous submission is still in flight, or when
    /// the fields cannot be encoded (an error notice is set in that case).
    pub fn begin_submit(&mut self) -> Option<CreateIntegrationRequest> {
        if self.submitting {
            return None;
        }
        self.notice = None;

        let payload: CredentialPayload = self.fields.clone().into();
        let blob = match payload.encode() {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!(
                    provider = %F::PROVIDER,
                    error = %err,
                    "could not encode credentials"
                );
                self.notice = Some(Notice::error("Failed to save integration"));
                return None;
            }
        };

        self.submitting = true;
        Some(CreateIntegrationRequest {
            name: F::PROVIDER.display_name().to_string(),
            integration_type: F::PROVIDER.as_str().to_string(),
            credential_blob: blob,
            is_active: Some(self.is_active),
        })
    }

    /// Record the outcome of the create call started by `begin_submit`.
    ///
    /// A create the server accepted counts as saved even when its reply did
    /// not decode, so the operator is not invited to submit a duplicate.
    pub fn finish_submit(&mut self, result: &Result<Integration, ClientError>) {
        self.submitting = false;
        match result {
            Ok(integration) => {
                tracing::info!(
                    integration_id = %integration.id,
                    provider = %F::PROVIDER,
                    "integration saved"
                );
                self.mark_saved();
            }
            Err(err) if err.was_applied() => {
                tracing::warn!(
                    provider = %F::PROVIDER,
                    error = %err,
                    "integration saved, reply unreadable"
                );
                self.mark_saved();
            }
            Err(err) => {
                tracing::warn!(provider = %F::PROVIDER, error = %err, "saving integration failed");
                self.notice = Some(Notice::error(submit_error_text(err)));
            }
        }
    }

    fn mark_saved(&mut self) {
        self.notice = Some(Notice::success(format!(
            "{} integration saved successfully!",
            F::PROVIDER.label()
        )));
        self.fields = F::default();
        self.is_active = true;
    }

    /// Submit the form through `client`.
    ///
    /// Returns the created record on success. The outcome is also reflected in
    /// [`notice`](Self::notice).
    pub async fn submit(&mut self, client: &IntegrationsClient) -> Option<Integration> {
        let request = self.begin_submit()?;
        let result = client.create(&request).await;
        self.finish_submit(&result);
        result.ok()
    }
}

fn submit_error_text(err: &ClientError) -> String {
    match err {
        ClientError::Api {
            message: Some(message),
            ..
        } => message.clone(),
        ClientError::Api { message: None, .. } | ClientError::Decode { .. } => {
            "Failed to save integration".to_string()
        }
        ClientError::Network(_) | ClientError::BaseUrl(_) => "Network error occurred".to_string(),
    }
}

impl<F: ProviderFields> fmt::Display for ProviderForm<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", F::PROVIDER.form_title())?;
        if let Some(notice) = &self.notice {
            writeln!(f, "{notice}")?;
        }
        writeln!(
            f,
            "Integration Active: {}",
            if self.is_active { "yes" } else { "no" }
        )?;
        if self.submitting {
            write!(f, "Saving...")
        } else {
            write!(f, "{}", F::PROVIDER.submit_label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reqwest::StatusCode;
    use uuid::Uuid;

    fn filled_fnb() -> FnbForm {
        let mut form = FnbForm::new();
        form.update(FormMsg::Edit(FnbField::ClientId("client".into())));
        form.update(FormMsg::Edit(FnbField::ClientSecret("secret".into())));
        form.update(FormMsg::Edit(FnbField::ApiKey("key".into())));
        form.update(FormMsg::Edit(FnbField::Environment(FnbEnvironment::Production)));
        form
    }

    fn created(request: &CreateIntegrationRequest) -> Integration {
        let now = Utc::now();
        Integration {
            id: Uuid::new_v4(),
            name: request.name.clone(),
            integration_type: request.integration_type.clone(),
            credential_blob: request.credential_blob.clone(),
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn request_carries_provider_identity() {
        let mut form = filled_fnb();
        form.update(FormMsg::SetActive(false));

        let request = form.begin_submit().unwrap();
        assert_eq!(request.name, "FNB Integration");
        assert_eq!(request.integration_type, "FNB");
        assert_eq!(request.is_active, Some(false));

        let decoded =
            CredentialPayload::decode(ProviderKind::Fnb, &request.credential_blob).unwrap();
        assert_eq!(decoded, CredentialPayload::Fnb(form.fields().clone()));
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut form = filled_fnb();
        assert!(form.begin_submit().is_some());
        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());
        assert!(form.to_string().ends_with("Saving..."));
    }

    #[test]
    fn success_resets_fields() {
        let mut form = filled_fnb();
        form.update(FormMsg::SetActive(false));
        let request = form.begin_submit().unwrap();

        form.finish_submit(&Ok(created(&request)));

        assert!(!form.is_submitting());
        assert_eq!(form.fields(), &FnbCredentials::default());
        assert!(form.is_active());
        assert_eq!(
            form.notice(),
            Some(&Notice::success("FNB integration saved successfully!"))
        );
    }

    #[test]
    fn failure_keeps_entered_values() {
        let mut form = filled_fnb();
        let before = form.fields().clone();
        form.begin_submit().unwrap();

        form.finish_submit(&Err(ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            message: Some("apiKey is required".to_string()),
        }));

        assert_eq!(form.fields(), &before);
        assert_eq!(form.notice(), Some(&Notice::error("apiKey is required")));
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let mut form = XeroForm::new();
        form.begin_submit().unwrap();

        form.finish_submit(&Err(ClientError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        }));

        assert_eq!(
            form.notice(),
            Some(&Notice::error("Failed to save integration"))
        );
    }

    #[test]
    fn clearing_optional_fields_drops_them() {
        let mut form = XeroForm::new();
        form.update(FormMsg::Edit(XeroField::WebhookUrl("https://hooks.example.com".into())));
        form.update(FormMsg::Edit(XeroField::WebhookUrl(String::new())));

        assert_eq!(form.fields().webhook_url, None);
        assert_eq!(form.fields().scopes, crate::models::credentials::DEFAULT_XERO_SCOPES);
    }
}
