//! Per-library OPAC HTTP client.
//!
//! Endpoints differ per library, so the client is configuration-driven: a
//! structured search URL, an optional redirect-resolver URL, and the URL
//! marker that distinguishes a catalog record page from an empty search
//! result after redirects.
//!
//! Lookup strategy:
//! 1. Structured search. Any returned record means the library holds the
//!    book; the record may also carry bibliographic fields worth
//!    backfilling.
//! 2. If the search comes back empty and a redirect resolver is
//!    configured, follow it and inspect the final URL. Some OPACs route
//!    known identifiers straight to the record page while the search index
//!    lags behind.

use serde::{Deserialize, Serialize};

use crate::enrichment::domain::{BibData, EnrichmentError};
use crate::enrichment::traits::HoldingHit;
use crate::model::{Identifier, LibraryTag};

/// Configured endpoints for one library's OPAC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpacEndpoint {
    /// Library tag the holding flag is recorded under
    pub tag: LibraryTag,
    /// Structured search URL; the ISBN is appended verbatim
    pub search_url: String,
    /// Redirect resolver URL; the ISBN is appended verbatim
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Substring of a resolved URL that marks a catalog record page
    #[serde(default = "default_record_marker")]
    pub record_marker: String,
}

fn default_record_marker() -> String {
    "opac_details".to_string()
}

/// Structured search response. OPAC installations share this shape across
/// the libraries we query; anything extra is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct SearchResponse {
    count: u32,
    records: Vec<SearchRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
struct SearchRecord {
    url: Option<String>,
    title: Option<String>,
    author: Option<String>,
    publisher: Option<String>,
    pubdate: Option<String>,
}

/// One library's OPAC client
pub struct OpacClient {
    endpoint: OpacEndpoint,
    http_client: reqwest::Client,
}

impl OpacClient {
    /// Create a client for a configured endpoint.
    pub fn new(endpoint: OpacEndpoint) -> Self {
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
            endpoint,
            http_client,
        }
    }

    pub fn tag(&self) -> &LibraryTag {
        &self.endpoint.tag
    }

    /// Check whether this library holds the identified book.
    pub async fn check(&self, identifier: &Identifier) -> Result<HoldingHit, EnrichmentError> {
        let Some(isbn) = identifier.as_isbn13() else {
            // OPAC queries are ISBN-keyed; nothing to ask for a vendor code
            return Err(EnrichmentError::NotFound);
        };

        if let Some(hit) = self.search(&isbn).await? {
            return Ok(hit);
        }

        if self.endpoint.redirect_url.is_some() {
            return self.resolve_redirect(&isbn).await;
        }

        Ok(HoldingHit::default())
    }

    /// Structured search; `Ok(None)` means the search ran but found nothing.
    async fn search(&self, isbn: &str) -> Result<Option<HoldingHit>, EnrichmentError> {
        let url = format!("{}{}", self.endpoint.search_url, isbn);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        let status = response.status();

        // An empty index answers 404 on some installations
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
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
            .json::<SearchResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        let Some(record) = body.records.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(HoldingHit {
            held: true,
            opac_url: record.url.clone(),
            bib: Some(to_bib(record)),
        }))
    }

    /// Follow the redirect resolver and inspect where it lands.
    async fn resolve_redirect(&self, isbn: &str) -> Result<HoldingHit, EnrichmentError> {
        let Some(base) = self.endpoint.redirect_url.as_deref() else {
            return Ok(HoldingHit::default());
        };
        let url = format!("{base}{isbn}");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Transport(e.to_string()))?;

        // reqwest has already followed the redirect chain here
        let resolved = response.url().as_str().to_string();

        if resolved.contains(&self.endpoint.record_marker) {
            Ok(HoldingHit {
                held: true,
                opac_url: Some(resolved),
                bib: None,
            })
        } else {
            Ok(HoldingHit::default())
        }
    }
}

fn to_bib(record: SearchRecord) -> BibData {
    BibData {
        title: record.title.filter(|s| !s.is_empty()),
        author: record.author.filter(|s| !s.is_empty()),
        publisher: record.publisher.filter(|s| !s.is_empty()),
        published_date: record.pubdate.filter(|s| !s.is_empty()),
        description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> OpacEndpoint {
        OpacEndpoint {
            tag: LibraryTag::from("sophia"),
            search_url: "https://opac.example.ac.jp/api/search?isbn=".to_string(),
            redirect_url: Some("https://opac.example.ac.jp/openurl?isbn=".to_string()),
            record_marker: "opac_details".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = OpacClient::new(endpoint());
        assert_eq!(client.tag().as_str(), "sophia");
    }

    #[test]
    fn test_endpoint_deserializes_with_defaults() {
        let toml = r#"
tag = "utokyo"
search_url = "https://opac.example.ac.jp/api/search?isbn="
"#;
        let parsed: OpacEndpoint = toml::from_str(toml).unwrap();
        assert_eq!(parsed.tag.as_str(), "utokyo");
        assert_eq!(parsed.redirect_url, None);
        assert_eq!(parsed.record_marker, "opac_details");
    }

    #[test]
    fn test_search_response_shape() {
        let json = r#"{
            "count": 1,
            "records": [{
                "url": "https://opac.example.ac.jp/opac_details/12345",
                "title": "こころ",
                "author": "夏目漱石"
            }]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.count, 1);
        assert_eq!(parsed.records[0].title.as_deref(), Some("こころ"));
    }
}
