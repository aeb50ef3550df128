//! OpenBD HTTP client
//!
//! Bulk endpoint: one GET resolves every requested ISBN at once.
//! See: https://openbd.jp/
//!
//! No API key and no per-request quota, but requests should still be kept
//! to one batch per run - the comma-joined form exists exactly for that.

use super::{adapter, dto};
use crate::enrichment::domain::EnrichmentError;
use crate::enrichment::traits::BulkHit;
use crate::model::Identifier;

/// OpenBD API client
pub struct OpenBdClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenBdClient {
    /// Create a new client
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://api.openbd.jp".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Resolve a batch of identifiers in one request.
    ///
    /// Input must already be filtered to ISBNs; identifiers without an
    /// ISBN-13 form come back as misses without being sent upstream.
    pub async fn fetch_bulk(
        &self,
        identifiers: &[Identifier],
    ) -> Result<Vec<BulkHit>, EnrichmentError> {
        let isbns: Vec<String> = identifiers
            .iter()
            .filter_map(Identifier::as_isbn13)
            .collect();

        let url = format!("{}/v1/get?isbn={}", self.base_url, isbns.join(","));

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            return Err(EnrichmentError::Transport(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let slots = response
            .json::<Vec<Option<dto::BookEntry>>>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        Ok(adapter::to_bulk_hits(identifiers, slots))
    }
}

impl Default for OpenBdClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OpenBdClient::new();
        assert_eq!(client.base_url, "https://api.openbd.jp");
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = OpenBdClient::with_base_url("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
