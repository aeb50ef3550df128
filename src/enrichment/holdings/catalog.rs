//! Synchronous identifier catalogs.
//!
//! Some collections publish their holdings as exported documents rather
//! than an API. Those exports are condensed (out of band) into a JSON array
//! of identifiers; checking a record against them is a pure set-membership
//! test - no network call, no delay.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::enrichment::domain::EnrichmentError;
use crate::enrichment::traits::CatalogProvider;
use crate::model::{Identifier, LibraryTag};

/// Catalog backed by a JSON file containing an array of identifier strings.
pub struct JsonFileCatalog {
    tag: LibraryTag,
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(tag: LibraryTag, path: impl Into<PathBuf>) -> Self {
        Self {
            tag,
            path: path.into(),
        }
    }
}

impl CatalogProvider for JsonFileCatalog {
    fn tag(&self) -> &LibraryTag {
        &self.tag
    }

    fn load(&self) -> Result<HashSet<String>, EnrichmentError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            EnrichmentError::Config(format!(
                "failed to read catalog {}: {e}",
                self.path.display()
            ))
        })?;

        let raw: Vec<String> = serde_json::from_str(&contents).map_err(|e| {
            EnrichmentError::Config(format!(
                "failed to parse catalog {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(raw.iter().map(|s| normalize(s)).collect())
    }
}

/// In-memory catalog, mostly useful in tests and ad-hoc runs.
pub struct StaticCatalog {
    tag: LibraryTag,
    entries: HashSet<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(tag: LibraryTag, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tag,
            entries: entries
                .into_iter()
                .map(|s| normalize(s.as_ref()))
                .collect(),
        }
    }
}

impl CatalogProvider for StaticCatalog {
    fn tag(&self) -> &LibraryTag {
        &self.tag
    }

    fn load(&self) -> Result<HashSet<String>, EnrichmentError> {
        Ok(self.entries.clone())
    }
}

/// A catalog after its one load per run, ready for membership tests.
pub struct LoadedCatalog {
    tag: LibraryTag,
    entries: HashSet<String>,
}

impl LoadedCatalog {
    /// Load once; reused for every record in the batch.
    pub fn from_provider(provider: &dyn CatalogProvider) -> Result<Self, EnrichmentError> {
        Ok(Self {
            tag: provider.tag().clone(),
            entries: provider.load()?,
        })
    }

    pub fn tag(&self) -> &LibraryTag {
        &self.tag
    }

    /// Membership test, comparing in normalized identifier form.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        let key = identifier
            .as_isbn13()
            .unwrap_or_else(|| identifier.to_string());
        self.entries.contains(&normalize(&key))
    }
}

/// Catalog exports mix ISBN-10, ISBN-13, and raw codes; store everything in
/// the same form we query with.
fn normalize(raw: &str) -> String {
    let identifier = Identifier::parse(raw);
    identifier
        .as_isbn13()
        .unwrap_or_else(|| identifier.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_membership() {
        let catalog = StaticCatalog::new(
            LibraryTag::from("math-lib"),
            ["9784101010137", "BW-1234567"],
        );
        let loaded = LoadedCatalog::from_provider(&catalog).unwrap();

        assert!(loaded.contains(&Identifier::parse("9784101010137")));
        // Mixed forms match: the catalog holds ISBN-13, the record ISBN-10
        assert!(loaded.contains(&Identifier::parse("4101010137")));
        assert!(loaded.contains(&Identifier::parse("BW-1234567")));
        assert!(!loaded.contains(&Identifier::parse("9780141439518")));
    }

    #[test]
    fn test_json_file_catalog_roundtrip() {
        let dir = std::env::temp_dir().join("book-minder-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(&path, r#"["4101010137", "9780141439518"]"#).unwrap();

        let catalog = JsonFileCatalog::new(LibraryTag::from("math-lib"), &path);
        let loaded = LoadedCatalog::from_provider(&catalog).unwrap();

        // ISBN-10 entries are normalized to ISBN-13 on load
        assert!(loaded.contains(&Identifier::parse("9784101010137")));
        assert!(loaded.contains(&Identifier::parse("9780141439518")));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let catalog = JsonFileCatalog::new(
            LibraryTag::from("math-lib"),
            "/nonexistent/catalog.json",
        );
        let result = catalog.load();
        assert!(matches!(result, Err(EnrichmentError::Config(_))));
    }
}
