//! Google Books HTTP client
//!
//! See: https://developers.google.com/books/docs/v1/using
//!
//! Works unauthenticated at a low quota; an API key raises the daily limit
//! and is passed as the `key` query parameter when configured.

use super::{adapter, dto};
use crate::enrichment::domain::{BibData, EnrichmentError};
use crate::model::Identifier;

/// Google Books API client
pub struct GoogleBooksClient {
    api_key: Option<String>,
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleBooksClient {
    /// Create a new client; `api_key` is optional.
    pub fn new(api_key: Option<String>) -> Self {
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
            api_key,
            http_client,
            base_url: "https://www.googleapis.com".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_key: None,
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Look up one identifier via an `isbn:` volumes query.
    ///
    /// Older volumes are sometimes indexed only under their ISBN-10, so a
    /// miss on the ISBN-13 form retries with the ISBN-10 form when one
    /// exists.
    pub async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError> {
        let Some(isbn13) = identifier.as_isbn13() else {
            return Err(EnrichmentError::NotFound);
        };

        match self.query(&isbn13).await {
            Err(EnrichmentError::NotFound) => match identifier.as_isbn10() {
                Some(isbn10) => self.query(&isbn10).await,
                None => Err(EnrichmentError::NotFound),
            },
            result => result,
        }
    }

    /// Run a single `isbn:` volumes query.
    async fn query(&self, isbn: &str) -> Result<BibData, EnrichmentError> {
        let mut url = format!(
            "{}/books/v1/volumes?q=isbn:{}",
            self.base_url,
            urlencoding::encode(isbn)
        );
        if let Some(ref key) = self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }

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

        let body = response
            .json::<dto::VolumesResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        adapter::to_bib(body)
    }
}
