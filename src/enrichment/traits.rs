//! Trait definitions for external data sources.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! Three source shapes exist:
//! - [`BulkProvider`]: resolves many identifiers in a single request
//! - [`BiblioProvider`]: resolves one identifier per request
//! - [`HoldingsSource`] / [`CatalogProvider`]: physical-library holdings,
//!   asynchronous (OPAC API) and synchronous (pre-loaded set) respectively

use std::collections::HashSet;

use async_trait::async_trait;

use super::domain::{BibData, EnrichmentError, ProviderKind};
use crate::model::{Identifier, LibraryTag};

/// Per-identifier result slot from a bulk lookup.
#[derive(Debug, Clone)]
pub struct BulkHit {
    /// The identifier this slot answers
    pub identifier: Identifier,
    /// Bibliographic payload, `None` when the provider has no record
    pub bib: Option<BibData>,
}

/// Result of one holdings check against one library.
#[derive(Debug, Clone, Default)]
pub struct HoldingHit {
    /// Whether the library owns a copy
    pub held: bool,
    /// OPAC record link, when the library exposes one
    pub opac_url: Option<String>,
    /// Bibliographic fields the OPAC happened to return
    pub bib: Option<BibData>,
}

/// A provider capable of resolving many identifiers per request.
///
/// Callers must pre-filter to identifiers the provider supports; no ISBN
/// validation happens inside the adapter.
#[async_trait]
pub trait BulkProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Resolve a batch. On success the result carries exactly one slot per
    /// input identifier; on transport error the whole call fails and the
    /// caller degrades the batch to not-found.
    async fn fetch_bulk(
        &self,
        identifiers: &[Identifier],
    ) -> Result<Vec<BulkHit>, EnrichmentError>;
}

/// A single-record bibliographic provider.
#[async_trait]
pub trait BiblioProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Look up one identifier. `Err(NotFound)` is the provider's normal
    /// "no record" answer, not a failure.
    async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError>;
}

/// An asynchronous library holdings source (OPAC API).
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    fn tag(&self) -> &LibraryTag;

    async fn check(&self, identifier: &Identifier) -> Result<HoldingHit, EnrichmentError>;
}

/// A synchronous, pre-loaded identifier catalog.
///
/// Loaded once per run and reused across all records; membership testing is
/// pure, no network involved.
pub trait CatalogProvider: Send + Sync {
    fn tag(&self) -> &LibraryTag;

    fn load(&self) -> Result<HashSet<String>, EnrichmentError>;
}

// Implement traits for real clients

#[async_trait]
impl BulkProvider for super::openbd::OpenBdClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenBd
    }

    async fn fetch_bulk(
        &self,
        identifiers: &[Identifier],
    ) -> Result<Vec<BulkHit>, EnrichmentError> {
        self.fetch_bulk(identifiers).await
    }
}

#[async_trait]
impl BiblioProvider for super::ndl::NdlClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ndl
    }

    async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError> {
        self.lookup(identifier).await
    }
}

#[async_trait]
impl BiblioProvider for super::isbndb::IsbndbClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Isbndb
    }

    async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError> {
        self.lookup(identifier).await
    }
}

#[async_trait]
impl BiblioProvider for super::googlebooks::GoogleBooksClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleBooks
    }

    async fn lookup(&self, identifier: &Identifier) -> Result<BibData, EnrichmentError> {
        self.lookup(identifier).await
    }
}

#[async_trait]
impl HoldingsSource for super::holdings::OpacClient {
    fn tag(&self) -> &LibraryTag {
        self.tag()
    }

    async fn check(&self, identifier: &Identifier) -> Result<HoldingHit, EnrichmentError> {
        self.check(identifier).await
    }
}
