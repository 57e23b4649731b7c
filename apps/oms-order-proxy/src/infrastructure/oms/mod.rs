//! Upstream OMS API Client
//!
//! Implements [`OrderSource`] against the vendor's order search
//! endpoint: a form-encoded `POST` with bearer-token and client-id
//! headers, cursor-paginated by ascending order `id`.
//!
//! # Wire Contract
//!
//! Request body fields: `start_order_date` and `end_order_date` (unix
//! seconds, inclusive), `limit` (page size), `last_id` (cursor, 0 for
//! the first page). Response body: `{"data": [Order, ...]}` where a
//! missing or null `data` is treated as an empty page.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::application::ports::{OrderSource, SourceError};
use crate::domain::dates::DayWindow;
use crate::domain::orders::Order;
use crate::infrastructure::config::Credentials;

/// Header carrying the OMS client id.
const OMS_CID_HEADER: &str = "Oms-Cid";

// =============================================================================
// Configuration
// =============================================================================

/// Settings for the OMS client.
#[derive(Debug, Clone)]
pub struct OmsClientConfig {
    /// Order search endpoint URL.
    pub base_url: String,
    /// Upstream credentials.
    pub credentials: Credentials,
    /// Orders requested per page.
    pub page_size: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

// =============================================================================
// Errors
// =============================================================================

/// Errors constructing the OMS client.
#[derive(Debug, Error)]
pub enum OmsClientError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

// =============================================================================
// Client
// =============================================================================

/// Reqwest-backed client for the upstream order search endpoint.
pub struct OmsClient {
    http: reqwest::Client,
    config: OmsClientConfig,
}

impl OmsClient {
    /// Create a new client with a connection pool and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: OmsClientConfig) -> Result<Self, OmsClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OmsClientError::Build(e.to_string()))?;

        Ok(Self { http, config })
    }
}

/// Response envelope of the order search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<Order>>,
}

#[async_trait]
impl OrderSource for OmsClient {
    async fn fetch_page(&self, window: DayWindow, last_id: i64) -> Result<Vec<Order>, SourceError> {
        let form = [
            ("start_order_date", window.start.to_string()),
            ("end_order_date", window.end.to_string()),
            ("limit", self.config.page_size.to_string()),
            ("last_id", last_id.to_string()),
        ];

        tracing::trace!(
            start = window.start,
            end = window.end,
            last_id,
            "requesting order page"
        );

        let response = self
            .http
            .post(&self.config.base_url)
            .bearer_auth(self.config.credentials.token())
            .header(OMS_CID_HEADER, self.config.credentials.client_id())
            .form(&form)
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let envelope: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(envelope.data.unwrap_or_default())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_decodes_order_pages() {
        let envelope: SearchResponse =
            serde_json::from_value(json!({"data": [{"id": 1}, {"id": 2}]})).unwrap();
        let orders = envelope.data.unwrap_or_default();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id(), Some(1));
    }

    #[test]
    fn envelope_treats_null_or_missing_data_as_empty() {
        let null: SearchResponse = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(null.data.unwrap_or_default().is_empty());

        let missing: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(missing.data.unwrap_or_default().is_empty());
    }

    #[test]
    fn client_builds_with_defaults() {
        let config = OmsClientConfig {
            base_url: "https://example.com/order_api/orders".to_string(),
            credentials: Credentials::new("token".to_string(), "310958".to_string()),
            page_size: 100,
            request_timeout: Duration::from_secs(10),
        };
        assert!(OmsClient::new(config).is_ok());
    }
}
