//! NDL Search HTTP client
//!
//! Queries the OpenSearch endpoint of NDL Search (the National Diet
//! Library's public catalog search).
//! See: https://ndlsearch.ndl.go.jp/help/api/specifications
//!
//! The endpoint is unauthenticated but rate limited by convention; callers
//! must space their requests (the service layer handles the delays).

use super::{adapter, dto};
use crate::enrichment::domain::{BibData, EnrichmentError};
use crate::model::Identifier;

/// NDL Search API client
pub struct NdlClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl NdlClient {
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
            base_url: "https://ndlsearch.ndl.go.jp".to_string(),
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

    /// Look up one identifier in the NDL catalog.
    pub async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError> {
        let Some(isbn) = identifier.as_isbn13() else {
            // Vendor codes are not searchable here
            return Err(EnrichmentError::NotFound);
        };

        let url = format!(
            "{}/api/opensearch?isbn={}",
            self.base_url,
            urlencoding::encode(&isbn)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound);
        }

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

        let body = response
            .text()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let feed: dto::Rss = quick_xml::de::from_str(&body)
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        adapter::to_bib(feed)
    }
}

impl Default for NdlClient {
    fn default() -> Self {
        Self::new()
    }
}
