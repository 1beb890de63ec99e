//! HTTP client for the integrations API.
//!
//! Used by the provider forms and the integration list view. Every call is a
//! single request; there is no retry or queuing.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use crate::models::integration::{
    CreateIntegrationRequest, Integration, IntegrationSummary, UpdateIntegrationRequest,
};

/// Errors returned by [`IntegrationsClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server accepted the request but its success body did not decode.
    #[error("unexpected response body ({status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    ///
    /// `message` is the server's error message when the body carried one.
    #[error("API error {status}")]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Whether the server applied the request, even though the reply was unusable.
    pub fn was_applied(&self) -> bool {
        matches!(self, ClientError::Decode { .. })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for `/integrations`.
#[derive(Debug, Clone)]
pub struct IntegrationsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl IntegrationsClient {
    /// Create a client for the API served at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_http(reqwest::Client::new(), Url::parse(base_url)?))
    }

    pub fn with_http(http: reqwest::Client, mut base_url: Url) -> Self {
        // Keep any path prefix when joining relative segments
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /integrations`
    pub async fn list(&self) -> Result<Vec<IntegrationSummary>, ClientError> {
        let response = self.request(Method::GET, "integrations")?.send().await?;
        decode(check(response).await?).await
    }

    /// `POST /integrations`
    pub async fn create(
        &self,
        request: &CreateIntegrationRequest,
    ) -> Result<Integration, ClientError> {
        let response = self
            .request(Method::POST, "integrations")?
            .json(request)
            .send()
            .await?;
        decode(check(response).await?).await
    }

    /// `PATCH /integrations/{id}`
    pub async fn update(
        &self,
        id: Uuid,
        request: &UpdateIntegrationRequest,
    ) -> Result<Integration, ClientError> {
        let response = self
            .request(Method::PATCH, &format!("integrations/{id}"))?
            .json(request)
            .send()
            .await?;
        decode(check(response).await?).await
    }

    /// `DELETE /integrations/{id}`
    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("integrations/{id}"))?
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path)?;
        Ok(self.http.request(method, url))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    response
        .json()
        .await
        .map_err(|source| ClientError::Decode { status, source })
}

/// Turn non-success responses into `ClientError::Api`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // The body is best effort; a missing or foreign error shape leaves message empty
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.error.message);

    Err(ClientError::Api { status, message })
}
