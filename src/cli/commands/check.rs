//! Configuration diagnostics commands.

use crate::config::{self, Config};
use crate::enrichment::holdings::{JsonFileCatalog, OpacEndpoint};
use crate::enrichment::traits::CatalogProvider;
use crate::model::LibraryTag;

/// Report what the current configuration resolves to.
pub fn cmd_check_config() -> anyhow::Result<()> {
    println!("Checking book-minder configuration...\n");

    match config::config_path() {
        Some(path) if path.exists() => println!("✓ Config file: {:?}", path),
        Some(path) => println!("✗ Config file: {:?} (not found, defaults in use)", path),
        None => println!("✗ Config directory could not be determined"),
    }

    let cfg = config::load();

    println!();
    println!("API Keys:");
    if std::env::var("ISBNDB_API_KEY").is_ok() || cfg.credentials.isbndb_api_key.is_some() {
        println!("✓ ISBNdb key: set");
    } else {
        println!("✗ ISBNdb key: NOT SET (required for enrichment)");
        println!("  Get one at: https://isbndb.com/isbn-database");
    }
    if std::env::var("GOOGLE_BOOKS_API_KEY").is_ok()
        || cfg.credentials.google_books_api_key.is_some()
    {
        println!("✓ Google Books key: set");
    } else {
        println!("- Google Books key: not set (optional, lower quota applies)");
    }

    println!();
    println!("Libraries: {}", cfg.libraries.len());
    for library in &cfg.libraries {
        let fallback = if library.redirect_url.is_some() {
            "search + redirect fallback"
        } else {
            "search only"
        };
        println!("  {} - {} ({})", library.tag, library.search_url, fallback);
    }

    println!();
    match cfg.catalog {
        Some(ref settings) => {
            let provider =
                JsonFileCatalog::new(LibraryTag::new(&settings.tag), &settings.path);
            match provider.load() {
                Ok(identifiers) => println!(
                    "✓ Catalog '{}': {} identifier(s)",
                    settings.tag,
                    identifiers.len()
                ),
                Err(e) => println!("✗ Catalog '{}': {}", settings.tag, e),
            }
        }
        None => println!("- No synchronous catalog configured (optional)"),
    }

    Ok(())
}

/// Write a starter config with one example library entry.
pub fn cmd_init_config() -> anyhow::Result<()> {
    if let Some(path) = config::config_path()
        && path.exists()
    {
        println!("Config already exists at {:?}, leaving it alone.", path);
        return Ok(());
    }

    let mut cfg = Config::default();
    cfg.libraries.push(OpacEndpoint {
        tag: "example-univ".into(),
        search_url: "https://opac.example.ac.jp/api/search?isbn=".to_string(),
        redirect_url: Some("https://opac.example.ac.jp/openurl?isbn=".to_string()),
        record_marker: "opac_details".to_string(),
    });

    config::save(&cfg)?;
    if let Some(path) = config::config_path() {
        println!("Wrote starter config to {:?}", path);
        println!("Edit the library entries and add your API keys.");
    }
    Ok(())
}
