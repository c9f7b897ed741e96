//! HTTP fetcher implementation

use std::time::Duration;

use quest_core::Endpoint;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the record endpoints of quest backends
///
/// One instance is shared across requests so connections are pooled.
/// Requests are never retried.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
}

impl ServiceClient {
    /// Create a client with the default transport timeouts
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with custom timeouts
    pub fn with_config(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Get a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// GET `http://{host}:{port}{path}` and decode a JSON array of `T`
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        path: &str,
    ) -> Result<Vec<T>> {
        let url = Url::parse(&endpoint.url(path))?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::transport(url.as_str(), e))?;

        self.handle_response(url.as_str(), response).await
    }

    /// Check a backend's health endpoint
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    pub async fn health(&self, endpoint: &Endpoint) -> Result<String> {
        let url = Url::parse(&endpoint.url("/health"))?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::transport(url.as_str(), e))?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(ClientError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Handle response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::ServerError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(url, e))?;

        serde_json::from_slice(&body).map_err(|e| ClientError::ParseError(e.to_string()))
    }
}
