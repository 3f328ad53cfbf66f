//! HTTP client for the dispatch snapshot API.
//!
//! This module provides the [`DispatchApi`] implementation used by live
//! tracking sessions. Every call fetches one full collection; there is no
//! pagination and no delta endpoint.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;

use fleetmap_core::dispatch::Case;
use fleetmap_core::errors::FetchError;
use fleetmap_core::facilities::Facility;
use fleetmap_core::fleet::Vehicle;
use fleetmap_core::live::DispatchApi;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the dispatch REST API.
///
/// # Example
///
/// ```ignore
/// let client = DispatchApiClient::new("http://localhost:8080")?;
/// let vehicles = client.fetch_vehicles().await?;
/// ```
#[derive(Debug, Clone)]
pub struct DispatchApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl DispatchApiClient {
    /// Create a new dispatch API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the dispatch service (e.g., "http://localhost:8080")
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                FetchError::Network(format!("Failed to initialize HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Make a GET request and parse the response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[DispatchApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("Request failed: {}", e)))?;

        self.parse_response(response).await
    }

    /// Parse an HTTP response, handling errors appropriately.
    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            FetchError::Decode(format!(
                "Failed to parse response: {} - {}",
                e,
                body.chars().take(200).collect::<String>()
            ))
        })
    }
}

#[async_trait]
impl DispatchApi for DispatchApiClient {
    async fn fetch_vehicles(&self) -> Result<Vec<Vehicle>, FetchError> {
        self.get("/vehicles").await
    }

    async fn fetch_cases(&self) -> Result<Vec<Case>, FetchError> {
        self.get("/cases").await
    }

    async fn fetch_facilities(&self) -> Result<Vec<Facility>, FetchError> {
        self.get("/facilities").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DispatchApiClient::new("http://localhost:8080");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_url_normalization() {
        let client = DispatchApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
