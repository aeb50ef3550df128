//! ISBNdb HTTP client
//!
//! See: https://isbndb.com/apidocs/v2
//!
//! Every request carries the subscription key in the Authorization header.
//! The free tier allows one request per second; the service layer's
//! inter-call delays keep us under that.

use super::{adapter, dto};
use crate::enrichment::domain::{BibData, EnrichmentError};
use crate::model::Identifier;

/// ISBNdb API client
pub struct IsbndbClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl IsbndbClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
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
            api_key: api_key.into(),
            http_client,
            base_url: "https://api2.isbndb.com".to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Look up one identifier.
    pub async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError> {
        let Some(isbn) = identifier.as_isbn13() else {
            return Err(EnrichmentError::NotFound);
        };

        let url = format!("{}/book/{}", self.base_url, urlencoding::encode(&isbn));

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
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

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(EnrichmentError::Config(
                "ISBNdb rejected the API key".to_string(),
            ));
        }

        if !status.is_success() {
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(EnrichmentError::Api(error.message));
            }
            return Err(EnrichmentError::Transport(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .json::<dto::BookResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        Ok(adapter::to_bib(body))
    }
}
