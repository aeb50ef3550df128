//! Batch enrichment command.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::enrichment::holdings::JsonFileCatalog;
use crate::enrichment::traits::CatalogProvider;
use crate::enrichment::{
    EnrichmentConfig, EnrichmentError, EnrichmentService, ProviderKind,
};
use crate::model::LibraryTag;
use crate::{config, error};

use super::{load_snapshot, save_snapshot};

/// Enrich every record in a snapshot and write the result back.
#[allow(clippy::too_many_arguments)]
pub fn cmd_enrich(
    rt: &Runtime,
    input: &Path,
    output: Option<&Path>,
    isbndb_key: Option<&str>,
    google_books_key: Option<&str>,
    concurrency: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let cfg = config::load();

    // CLI/env credentials win over the config file
    let isbndb_key = isbndb_key
        .map(String::from)
        .or_else(|| cfg.credentials.isbndb_api_key.clone());
    let Some(isbndb_key) = isbndb_key else {
        eprintln!("Error: ISBNdb API key required.");
        eprintln!("Get one at: https://isbndb.com/isbn-database");
        eprintln!("Then use: --isbndb-key YOUR_KEY or set ISBNDB_API_KEY env var");
        std::process::exit(1);
    };
    let google_books_key = google_books_key
        .map(String::from)
        .or_else(|| cfg.credentials.google_books_api_key.clone());

    let mut snapshot = load_snapshot(input)?;
    if snapshot.books.is_empty() {
        println!("No book records in {:?}.", input);
        return Ok(());
    }

    if dry_run {
        let isbns = snapshot
            .books
            .iter()
            .filter(|b| b.identifier.is_isbn())
            .count();
        let found = snapshot
            .books
            .iter()
            .filter(|b| b.lookup.any_found())
            .count();
        println!("DRY RUN - no provider will be called\n");
        println!(
            "  {} record(s): {} with an ISBN, {} vendor-coded",
            snapshot.books.len(),
            isbns,
            snapshot.books.len() - isbns
        );
        println!("  {} already found on a previous run", found);
        println!("  {} librar(ies) configured", cfg.libraries.len());
        return Ok(());
    }

    let service_config = EnrichmentConfig {
        isbndb_api_key: isbndb_key,
        google_books_api_key: google_books_key,
        concurrency: concurrency.unwrap_or(cfg.enrichment.concurrency),
        provider_delay: Duration::from_millis(cfg.enrichment.provider_delay_ms),
    };

    let catalog = cfg
        .catalog
        .as_ref()
        .map(|c| JsonFileCatalog::new(LibraryTag::new(&c.tag), &c.path));
    let service = EnrichmentService::new(
        service_config,
        cfg.libraries.clone(),
        catalog.as_ref().map(|c| c as &dyn CatalogProvider),
    )?;

    println!("Enriching {} record(s)...", snapshot.books.len());

    rt.block_on(async {
        // First ctrl-c stops admitting records; in-flight lookups finish
        let cancel = service.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nCancelling - letting in-flight lookups finish...");
                cancel.cancel();
            }
        });

        match service.enrich(std::mem::take(&mut snapshot.books)).await {
            Ok(books) => {
                let found = books.iter().filter(|b| b.lookup.any_found()).count();
                let held = books
                    .iter()
                    .filter(|b| b.holdings.values().any(|f| *f == Some(true)))
                    .count();
                let errors = books.iter().filter(|b| b.error.is_some()).count();

                let mut by_provider: BTreeMap<ProviderKind, usize> = BTreeMap::new();
                for book in &books {
                    if let Some(kind) = book.lookup.found_by() {
                        *by_provider.entry(kind).or_default() += 1;
                    }
                }

                snapshot.books = books;
                snapshot.enriched_at = Some(chrono::Utc::now().to_rfc3339());

                let target = output.unwrap_or(input);
                save_snapshot(target, &snapshot)?;

                println!();
                println!(
                    "Done! {} identified, {} held somewhere, {} with errors",
                    found, held, errors
                );
                for (kind, count) in &by_provider {
                    println!("  {}: {}", kind, count);
                }
                println!("Wrote {:?}", target);
                Ok(())
            }
            Err(EnrichmentError::Cancelled) => {
                anyhow::bail!("Enrichment cancelled; snapshot left unchanged")
            }
            Err(e) => Err(error::Error::from(e).into()),
        }
    })
}
