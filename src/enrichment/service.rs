//! Enrichment service - orchestrates provider fallback and holdings lookups
//!
//! This is the high-level API for enriching a batch of book records:
//! 1. One bulk lookup for every supported identifier
//! 2. Sequential provider fallback (locale-ordered) for whatever the bulk
//!    stage missed, fanned out under a soft concurrency limit
//! 3. Library holdings lookups for every record, fanned out the same way
//! 4. A fold of the per-record results into a fresh collection, keyed by
//!    record identity
//!
//! Partial provider failure is invisible to the caller except as missing
//! fields; only configuration and cancellation problems fail a batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::enrichment::domain::{BibData, EnrichmentError, LookupOutcome};
use crate::enrichment::holdings::{LoadedCatalog, OpacClient, OpacEndpoint};
use crate::enrichment::locale;
use crate::enrichment::throttle::{DEFAULT_PROVIDER_DELAY, TaskPool, rate_limit_pause};
use crate::enrichment::traits::{
    BiblioProvider, BulkProvider, CatalogProvider, HoldingsSource,
};
use crate::enrichment::{
    googlebooks::GoogleBooksClient, isbndb::IsbndbClient, ndl::NdlClient,
    openbd::OpenBdClient,
};
use crate::model::{BookRecord, Identifier};

/// Configuration for the enrichment service
pub struct EnrichmentConfig {
    /// ISBNdb subscription key (required)
    pub isbndb_api_key: String,
    /// Google Books API key (optional, raises the daily quota)
    pub google_books_api_key: Option<String>,
    /// Soft limit on concurrently enriched records
    pub concurrency: usize,
    /// Base delay between two provider calls for the same record
    pub provider_delay: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            isbndb_api_key: String::new(),
            google_books_api_key: None,
            concurrency: 5,
            provider_delay: DEFAULT_PROVIDER_DELAY,
        }
    }
}

/// Service for enriching book records from external sources
pub struct EnrichmentService {
    concurrency: usize,
    provider_delay: Duration,
    bulk: Arc<dyn BulkProvider>,
    sequential: Vec<Arc<dyn BiblioProvider>>,
    libraries: Vec<Arc<dyn HoldingsSource>>,
    catalog: Option<Arc<LoadedCatalog>>,
    cancel: CancellationToken,
}

impl EnrichmentService {
    /// Create a service with the production provider set.
    ///
    /// Fails fast on configuration problems: a missing ISBNdb key or an
    /// unreadable catalog is fatal before any record is touched.
    pub fn new(
        config: EnrichmentConfig,
        endpoints: Vec<OpacEndpoint>,
        catalog: Option<&dyn CatalogProvider>,
    ) -> Result<Self, EnrichmentError> {
        if config.isbndb_api_key.is_empty() {
            return Err(EnrichmentError::Config(
                "ISBNdb API key is not configured".to_string(),
            ));
        }

        let sequential: Vec<Arc<dyn BiblioProvider>> = vec![
            Arc::new(NdlClient::new()),
            Arc::new(IsbndbClient::new(&config.isbndb_api_key)),
            Arc::new(GoogleBooksClient::new(config.google_books_api_key.clone())),
        ];

        let libraries = endpoints
            .into_iter()
            .map(|endpoint| Arc::new(OpacClient::new(endpoint)) as Arc<dyn HoldingsSource>)
            .collect();

        let catalog = catalog
            .map(LoadedCatalog::from_provider)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            concurrency: config.concurrency,
            provider_delay: config.provider_delay,
            bulk: Arc::new(OpenBdClient::new()),
            sequential,
            libraries,
            catalog,
            cancel: CancellationToken::new(),
        })
    }

    /// Create a service from explicit sources (dependency injection).
    pub fn from_sources(
        config: EnrichmentConfig,
        bulk: Arc<dyn BulkProvider>,
        sequential: Vec<Arc<dyn BiblioProvider>>,
        libraries: Vec<Arc<dyn HoldingsSource>>,
        catalog: Option<LoadedCatalog>,
    ) -> Self {
        Self {
            concurrency: config.concurrency,
            provider_delay: config.provider_delay,
            bulk,
            sequential,
            libraries,
            catalog: catalog.map(Arc::new),
            cancel: CancellationToken::new(),
        }
    }

    /// Token observers can trigger to stop the batch cooperatively.
    ///
    /// Cancellation stops admission of new per-record work; tasks already
    /// in flight finish, and the batch returns `Err(Cancelled)`.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Replace the cancellation token, e.g. to share one across services.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Enrich a batch of records.
    ///
    /// The returned collection carries exactly the input keys, in input
    /// order. Provider misses and transport failures degrade to missing
    /// fields; only configuration and cancellation problems return `Err`.
    pub async fn enrich(
        &self,
        batch: Vec<BookRecord>,
    ) -> Result<Vec<BookRecord>, EnrichmentError> {
        let input_keys: Vec<String> = batch.iter().map(|r| r.key.clone()).collect();
        tracing::info!(records = batch.len(), "starting enrichment batch");

        if self.cancel.is_cancelled() {
            return Err(EnrichmentError::Cancelled);
        }

        let records = self.bulk_stage(batch).await;
        let records = self.sequential_stage(records).await?;
        let records = self.holdings_stage(records).await?;

        let found = records.iter().filter(|r| r.lookup.any_found()).count();
        tracing::info!(
            records = records.len(),
            found,
            "enrichment batch complete"
        );

        Ok(fold_by_key(&input_keys, records))
    }

    /// Stage 1: one bulk call for every supported identifier.
    ///
    /// A transport failure here degrades the whole subset to not-found
    /// (status left NotAttempted) instead of aborting the batch.
    async fn bulk_stage(&self, mut records: Vec<BookRecord>) -> Vec<BookRecord> {
        let wanted: Vec<Identifier> = records
            .iter()
            .filter(|r| r.identifier.is_isbn() && !r.lookup.any_found())
            .map(|r| r.identifier.clone())
            .collect();

        if wanted.is_empty() {
            return records;
        }

        match self.bulk.fetch_bulk(&wanted).await {
            Ok(hits) => {
                let by_id: HashMap<Identifier, Option<BibData>> = hits
                    .into_iter()
                    .map(|hit| (hit.identifier, hit.bib))
                    .collect();

                for record in records.iter_mut() {
                    if !record.identifier.is_isbn() || record.lookup.any_found() {
                        continue;
                    }
                    match by_id.get(&record.identifier) {
                        Some(Some(bib)) => {
                            bib.apply_to(record);
                            record.lookup.mark(self.bulk.kind(), LookupOutcome::Found);
                        }
                        Some(None) => {
                            record.lookup.mark(self.bulk.kind(), LookupOutcome::Miss);
                        }
                        // No slot for this identifier: treat as never attempted
                        None => {}
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = %self.bulk.kind(),
                    error = %e,
                    "bulk lookup failed; records fall through to sequential providers"
                );
            }
        }

        records
    }

    /// Stage 2: locale-ordered sequential fallback for bulk misses.
    async fn sequential_stage(
        &self,
        records: Vec<BookRecord>,
    ) -> Result<Vec<BookRecord>, EnrichmentError> {
        let mut pool: TaskPool<BookRecord> = TaskPool::new();
        let mut done = Vec::with_capacity(records.len());

        for record in records {
            if self.cancel.is_cancelled() {
                pool.drain().await;
                return Err(EnrichmentError::Cancelled);
            }

            // Vendor codes have no bibliographic source; found records are
            // done already. Both pass through unchanged.
            if record.lookup.any_found() || !record.identifier.is_isbn() {
                done.push(record);
                continue;
            }

            let chain = self.chain_for(&record.identifier);
            pool.push(run_sequential(
                record,
                chain,
                self.provider_delay,
                self.cancel.clone(),
            ));
            if let Some(finished) = pool.wait(self.concurrency).await {
                done.push(finished);
            }
        }

        done.extend(pool.drain().await);
        Ok(done)
    }

    /// Stage 3: holdings lookups for every record.
    async fn holdings_stage(
        &self,
        records: Vec<BookRecord>,
    ) -> Result<Vec<BookRecord>, EnrichmentError> {
        if self.libraries.is_empty() && self.catalog.is_none() {
            return Ok(records);
        }

        let mut pool: TaskPool<BookRecord> = TaskPool::new();
        let mut done = Vec::with_capacity(records.len());

        for record in records {
            if self.cancel.is_cancelled() {
                pool.drain().await;
                return Err(EnrichmentError::Cancelled);
            }

            pool.push(run_holdings(
                record,
                self.libraries.clone(),
                self.catalog.clone(),
                self.provider_delay,
                self.cancel.clone(),
            ));
            if let Some(finished) = pool.wait(self.concurrency).await {
                done.push(finished);
            }
        }

        done.extend(pool.drain().await);
        Ok(done)
    }

    /// Resolve the sequential provider chain for one identifier's locale.
    fn chain_for(&self, identifier: &Identifier) -> Vec<Arc<dyn BiblioProvider>> {
        let locale = locale::classify(identifier);
        locale::ordered_providers(locale)
            .into_iter()
            .filter_map(|kind| {
                self.sequential.iter().find(|p| p.kind() == kind).cloned()
            })
            .collect()
    }
}

/// Try each provider in priority order until one finds the record.
///
/// First success wins - no aggregation across bibliographic sources. A miss
/// or failure marks the provider attempted and moves on; a jittered pause
/// separates consecutive attempts for this record, and none trails the last.
pub async fn run_sequential(
    mut record: BookRecord,
    chain: Vec<Arc<dyn BiblioProvider>>,
    base_delay: Duration,
    cancel: CancellationToken,
) -> BookRecord {
    for (position, provider) in chain.iter().enumerate() {
        if record.lookup.any_found() || cancel.is_cancelled() {
            break;
        }

        if position > 0 {
            rate_limit_pause(base_delay).await;
        }

        match provider.lookup(&record.identifier).await {
            Ok(bib) => {
                bib.apply_to(&mut record);
                record.lookup.mark(provider.kind(), LookupOutcome::Found);
                record.error = None;
                tracing::debug!(
                    provider = %provider.kind(),
                    key = %record.key,
                    "record found"
                );
            }
            Err(EnrichmentError::NotFound) => {
                record.lookup.mark(provider.kind(), LookupOutcome::Miss);
            }
            Err(e) => {
                tracing::warn!(
                    provider = %provider.kind(),
                    key = %record.key,
                    error = %e,
                    "provider lookup failed"
                );
                record.lookup.mark(provider.kind(), LookupOutcome::Miss);
                record.error = Some(format!("{}: {e}", provider.kind()));
            }
        }
    }

    record
}

/// Check each library for a physical holding, then the synchronous catalog.
///
/// Flags are per-library and independent: a failure against one library
/// records `false` for that library alone. OPAC bibliographic data only
/// backfills records that still have no fields at all.
pub async fn run_holdings(
    mut record: BookRecord,
    libraries: Vec<Arc<dyn HoldingsSource>>,
    catalog: Option<Arc<LoadedCatalog>>,
    base_delay: Duration,
    cancel: CancellationToken,
) -> BookRecord {
    // OPAC queries are ISBN-keyed; vendor-coded records keep their flags
    // unchecked rather than being recorded as "not held".
    if record.identifier.is_isbn() {
        let mut attempted = 0;
        for library in &libraries {
            if cancel.is_cancelled() {
                break;
            }
            // Already answered on a previous run
            if record.holding(library.tag()).is_some() {
                continue;
            }

            if attempted > 0 {
                rate_limit_pause(base_delay).await;
            }
            attempted += 1;

            match library.check(&record.identifier).await {
                Ok(hit) => {
                    record
                        .holdings
                        .insert(library.tag().clone(), Some(hit.held));
                    if hit.held {
                        if let Some(url) = hit.opac_url {
                            record.opac_links.insert(library.tag().clone(), url);
                        }
                        if !record.has_bib_fields()
                            && let Some(bib) = hit.bib
                        {
                            bib.backfill_into(&mut record);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        library = library.tag().as_str(),
                        key = %record.key,
                        error = %e,
                        "holdings lookup failed"
                    );
                    record
                        .holdings
                        .insert(library.tag().clone(), Some(false));
                }
            }
        }
    }

    // Pure membership test; runs even on re-enrichment, it costs nothing.
    if let Some(catalog) = catalog {
        record.holdings.insert(
            catalog.tag().clone(),
            Some(catalog.contains(&record.identifier)),
        );
    }

    record
}

/// Fold per-record results into a fresh collection in input key order.
///
/// Records are keyed by identity; the output key set always equals the
/// input key set because tasks never drop records. Anything unexpected is
/// appended in key order rather than silently lost.
fn fold_by_key(input_keys: &[String], records: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut by_key: HashMap<String, BookRecord> = records
        .into_iter()
        .map(|record| (record.key.clone(), record))
        .collect();

    let mut out = Vec::with_capacity(input_keys.len());
    for key in input_keys {
        if let Some(record) = by_key.remove(key) {
            out.push(record);
        }
    }

    let mut rest: Vec<BookRecord> = by_key.into_values().collect();
    rest.sort_by(|a, b| a.key.cmp(&b.key));
    out.extend(rest);
    out
}
