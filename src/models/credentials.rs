//! Provider credential payloads.
//!
//! Each provider has its own strongly typed field set. The store only ever sees
//! the encoded form: a compact JSON object kept verbatim in the `api_key` column.
//! The provider discriminator travels beside the blob (the record's `type`), so
//! the blob itself is untagged.
//!
//! # Blob Examples
//!
//! FNB:
//! ```json
//! {"clientId":"abc","clientSecret":"xyz","apiKey":"k","environment":"sandbox"}
//! ```
//!
//! Xero:
//! ```json
//! {"clientId":"abc","clientSecret":"xyz","redirectUri":"https://app.example.com/cb","scopes":"offline_access"}
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Scopes pre-filled on the Xero form.
pub const DEFAULT_XERO_SCOPES: &str = "offline_access accounting.transactions accounting.contacts";

/// Errors raised while encoding, decoding or checking a credential blob.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential payload is not valid for {provider}: {source}")]
    Malformed {
        provider: ProviderKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} is not a valid http(s) URL")]
    InvalidUrl { field: &'static str },
}

/// Providers with a dedicated credential form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Fnb,
    Xero,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Fnb, ProviderKind::Xero];

    /// Discriminator stored in the record's `type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Fnb => "FNB",
            ProviderKind::Xero => "XERO",
        }
    }

    /// Look up a provider by its discriminator. Unknown types yield `None`.
    pub fn from_type(integration_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == integration_type)
    }

    /// Fixed record name used when the form creates an integration.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Fnb => "FNB Integration",
            ProviderKind::Xero => "Xero Integration",
        }
    }

    /// Short label used in notices and buttons.
    pub fn label(self) -> &'static str {
        match self {
            ProviderKind::Fnb => "FNB",
            ProviderKind::Xero => "Xero",
        }
    }

    pub fn form_title(self) -> String {
        format!("{} Integration Configuration", self.label())
    }

    pub fn submit_label(self) -> String {
        format!("Save {} Integration", self.label())
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FNB API environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FnbEnvironment {
    #[default]
    Sandbox,
    Production,
}

/// Credential fields for the FNB banking API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FnbCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub api_key: String,
    #[serde(default)]
    pub environment: FnbEnvironment,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

/// Credential fields for the Xero accounting API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XeroCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl Default for XeroCredentials {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            scopes: DEFAULT_XERO_SCOPES.to_string(),
            webhook_url: None,
            description: None,
        }
    }
}

/// Credential payload keyed by provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPayload {
    Fnb(FnbCredentials),
    Xero(XeroCredentials),
}

impl CredentialPayload {
    pub fn provider(&self) -> ProviderKind {
        match self {
            CredentialPayload::Fnb(_) => ProviderKind::Fnb,
            CredentialPayload::Xero(_) => ProviderKind::Xero,
        }
    }

    /// Serialize the provider fields into the opaque blob stored with the record.
    pub fn encode(&self) -> Result<String, CredentialError> {
        let encoded = match self {
            CredentialPayload::Fnb(fields) => serde_json::to_string(fields),
            CredentialPayload::Xero(fields) => serde_json::to_string(fields),
        };
        encoded.map_err(|source| CredentialError::Malformed {
            provider: self.provider(),
            source,
        })
    }

    /// Parse a blob back into the field set of `provider`.
    pub fn decode(provider: ProviderKind, blob: &str) -> Result<Self, CredentialError> {
        let decoded = match provider {
            ProviderKind::Fnb => serde_json::from_str(blob).map(CredentialPayload::Fnb),
            ProviderKind::Xero => serde_json::from_str(blob).map(CredentialPayload::Xero),
        };
        decoded.map_err(|source| CredentialError::Malformed { provider, source })
    }

    /// Check required fields and URL shapes.
    pub fn validate(&self) -> Result<(), CredentialError> {
        match self {
            CredentialPayload::Fnb(fields) => {
                require("clientId", &fields.client_id)?;
                require("clientSecret", &fields.client_secret)?;
                require("apiKey", &fields.api_key)?;
                optional_url("webhookUrl", fields.webhook_url.as_deref())
            }
            CredentialPayload::Xero(fields) => {
                require("clientId", &fields.client_id)?;
                require("clientSecret", &fields.client_secret)?;
                require("redirectUri", &fields.redirect_uri)?;
                http_url("redirectUri", &fields.redirect_uri)?;
                require("scopes", &fields.scopes)?;
                optional_url("webhookUrl", fields.webhook_url.as_deref())
            }
        }
    }
}

impl From<FnbCredentials> for CredentialPayload {
    fn from(fields: FnbCredentials) -> Self {
        CredentialPayload::Fnb(fields)
    }
}

impl From<XeroCredentials> for CredentialPayload {
    fn from(fields: XeroCredentials) -> Self {
        CredentialPayload::Xero(fields)
    }
}

/// Decode and validate `blob` when `integration_type` names a known provider.
///
/// Blobs for unknown provider types pass through untouched.
pub fn check_blob(integration_type: &str, blob: &str) -> Result<(), CredentialError> {
    match ProviderKind::from_type(integration_type) {
        Some(provider) => CredentialPayload::decode(provider, blob)?.validate(),
        None => Ok(()),
    }
}

fn require(field: &'static str, value: &str) -> Result<(), CredentialError> {
    if value.trim().is_empty() {
        return Err(CredentialError::MissingField(field));
    }
    Ok(())
}

fn optional_url(field: &'static str, value: Option<&str>) -> Result<(), CredentialError> {
    match value {
        Some(value) => http_url(field, value),
        None => Ok(()),
    }
}

fn http_url(field: &'static str, value: &str) -> Result<(), CredentialError> {
    let parsed = url::Url::parse(value).map_err(|_| CredentialError::InvalidUrl { field })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(CredentialError::InvalidUrl { field }),
    }
}

// Older form versions wrote "" for untouched optional inputs.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
