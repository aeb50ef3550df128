//! Internal domain models for bibliographic enrichment.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All provider responses get converted into these types via adapters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::BookRecord;

/// External data sources known to the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Bulk ISBN resolver (many identifiers per request)
    OpenBd,
    /// National Diet Library search
    Ndl,
    /// ISBNdb REST API
    Isbndb,
    /// Google Books volumes API
    GoogleBooks,
}

impl ProviderKind {
    /// Stable name used in logs and serialized lookup status.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenBd => "openbd",
            Self::Ndl => "ndl",
            Self::Isbndb => "isbndb",
            Self::GoogleBooks => "google-books",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-provider attempt outcome.
///
/// `Miss` covers both an explicit provider "not found" and a failed attempt;
/// either way the provider was tried and produced nothing usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupOutcome {
    #[default]
    NotAttempted,
    Miss,
    Found,
}

/// Tri-state lookup bookkeeping per record.
///
/// Decides whether a later stage should still try a source and whether a
/// later success may overwrite earlier fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupStatus {
    outcomes: BTreeMap<ProviderKind, LookupOutcome>,
}

impl LookupStatus {
    /// Outcome for one provider (NotAttempted if never touched).
    pub fn outcome(&self, kind: ProviderKind) -> LookupOutcome {
        self.outcomes.get(&kind).copied().unwrap_or_default()
    }

    /// Record an attempt outcome for a provider.
    pub fn mark(&mut self, kind: ProviderKind, outcome: LookupOutcome) {
        self.outcomes.insert(kind, outcome);
    }

    /// Whether any provider has already found this record.
    pub fn any_found(&self) -> bool {
        self.outcomes
            .values()
            .any(|o| *o == LookupOutcome::Found)
    }

    /// The provider that found this record, if any.
    pub fn found_by(&self) -> Option<ProviderKind> {
        self.outcomes
            .iter()
            .find(|(_, o)| **o == LookupOutcome::Found)
            .map(|(k, _)| *k)
    }
}

/// Bibliographic fields returned by a provider.
///
/// Fields a provider cannot answer stay `None`; adapters normalize empty
/// strings to `None` so merges never blank out existing data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BibData {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
}

impl BibData {
    /// Whether this payload carries nothing at all.
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.publisher,
            &self.published_date,
            &self.description,
        ]
        .iter()
        .all(|f| f.as_deref().is_none_or(str::is_empty))
    }

    /// Merge this payload into a record, preferring non-empty provider values.
    ///
    /// Only valid while the record's lookup status shows no prior success;
    /// empty provider fields never blank out fields the record already has.
    pub fn apply_to(&self, record: &mut BookRecord) {
        apply_field(&mut record.title, &self.title);
        apply_field(&mut record.author, &self.author);
        apply_field(&mut record.publisher, &self.publisher);
        apply_field(&mut record.published_date, &self.published_date);
        apply_field(&mut record.description, &self.description);
    }

    /// Fill only currently-empty record fields, never overwriting.
    ///
    /// Holdings-stage backfill uses this so the bibliographic chain always
    /// wins over OPAC metadata.
    pub fn backfill_into(&self, record: &mut BookRecord) {
        backfill_field(&mut record.title, &self.title);
        backfill_field(&mut record.author, &self.author);
        backfill_field(&mut record.publisher, &self.publisher);
        backfill_field(&mut record.published_date, &self.published_date);
        backfill_field(&mut record.description, &self.description);
    }
}

fn apply_field(target: &mut Option<String>, source: &Option<String>) {
    if let Some(value) = source.as_deref().filter(|s| !s.is_empty()) {
        *target = Some(value.to_string());
    }
}

fn backfill_field(target: &mut Option<String>, source: &Option<String>) {
    if target.as_deref().is_none_or(str::is_empty) {
        apply_field(target, source);
    }
}

/// Errors that can occur during enrichment
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    /// Provider responded but has no record. A normal outcome, absorbed at
    /// the adapter boundary into a `LookupOutcome::Miss`.
    #[error("Provider has no matching record")]
    NotFound,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Enrichment cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Identifier;

    fn record() -> BookRecord {
        BookRecord::new("key-1", Identifier::parse("9784101010137"))
    }

    #[test]
    fn test_lookup_status_tristate() {
        let mut status = LookupStatus::default();
        assert_eq!(status.outcome(ProviderKind::Ndl), LookupOutcome::NotAttempted);
        assert!(!status.any_found());

        status.mark(ProviderKind::Ndl, LookupOutcome::Miss);
        assert_eq!(status.outcome(ProviderKind::Ndl), LookupOutcome::Miss);
        assert!(!status.any_found());

        status.mark(ProviderKind::Isbndb, LookupOutcome::Found);
        assert!(status.any_found());
        assert_eq!(status.found_by(), Some(ProviderKind::Isbndb));
        // The miss stays recorded alongside the find
        assert_eq!(status.outcome(ProviderKind::Ndl), LookupOutcome::Miss);
    }

    #[test]
    fn test_apply_prefers_non_empty_provider_values() {
        let mut rec = record();
        rec.title = Some("Scraped title".to_string());
        rec.author = Some("A. Author".to_string());

        let bib = BibData {
            title: Some("Kokoro".to_string()),
            author: Some(String::new()), // empty upstream must not blank
            publisher: Some("Shinchosha".to_string()),
            ..Default::default()
        };
        bib.apply_to(&mut rec);

        assert_eq!(rec.title.as_deref(), Some("Kokoro"));
        assert_eq!(rec.author.as_deref(), Some("A. Author"));
        assert_eq!(rec.publisher.as_deref(), Some("Shinchosha"));
    }

    #[test]
    fn test_backfill_never_overwrites() {
        let mut rec = record();
        rec.title = Some("Kokoro".to_string());

        let bib = BibData {
            title: Some("OPAC title variant".to_string()),
            author: Some("Natsume Soseki".to_string()),
            ..Default::default()
        };
        bib.backfill_into(&mut rec);

        assert_eq!(rec.title.as_deref(), Some("Kokoro"));
        assert_eq!(rec.author.as_deref(), Some("Natsume Soseki"));
    }

    #[test]
    fn test_bib_data_is_empty() {
        assert!(BibData::default().is_empty());
        assert!(
            BibData {
                title: Some(String::new()),
                ..Default::default()
            }
            .is_empty()
        );
        assert!(
            !BibData {
                title: Some("t".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_lookup_status_serializes_as_map() {
        let mut status = LookupStatus::default();
        status.mark(ProviderKind::GoogleBooks, LookupOutcome::Found);

        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"google-books":"found"}"#);
    }
}
