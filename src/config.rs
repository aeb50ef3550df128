//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\book-minder\config.toml
//! - macOS: ~/Library/Application Support/book-minder/config.toml
//! - Linux: ~/.config/book-minder/config.toml
//!
//! The config file is human-readable and editable. Credentials can also be
//! supplied per-run through CLI flags or environment variables, which take
//! precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::enrichment::holdings::OpacEndpoint;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Enrichment pipeline tuning
    pub enrichment: EnrichmentSettings,

    /// Library OPAC endpoints to check holdings against
    pub libraries: Vec<OpacEndpoint>,

    /// Pre-extracted synchronous holdings catalog
    pub catalog: Option<CatalogSettings>,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// ISBNdb subscription key
    pub isbndb_api_key: Option<String>,

    /// Google Books API key (optional, raises the daily quota)
    pub google_books_api_key: Option<String>,
}

/// Enrichment pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    /// Soft limit on concurrently enriched records
    pub concurrency: usize,

    /// Base delay between two provider calls for the same record (ms).
    /// Actual delays are jittered within +-20% of this.
    pub provider_delay_ms: u64,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            concurrency: 5,
            provider_delay_ms: 1500,
        }
    }
}

/// A synchronous holdings catalog: a JSON file of identifier strings
/// extracted once from a library's published documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Library tag the membership flag is recorded under
    pub tag: String,

    /// Path to the JSON identifier array
    pub path: PathBuf,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("book-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    // Ensure directory exists
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    // Serialize to pretty TOML
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[credentials]"));
        assert!(toml.contains("[enrichment]"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.credentials.isbndb_api_key = Some("test-key-123".to_string());
        config.enrichment.concurrency = 8;
        config.libraries.push(OpacEndpoint {
            tag: "sophia".into(),
            search_url: "https://opac.example.ac.jp/api/search?isbn=".to_string(),
            redirect_url: None,
            record_marker: "opac_details".to_string(),
        });

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();

        assert_eq!(
            parsed.credentials.isbndb_api_key,
            Some("test-key-123".to_string())
        );
        assert_eq!(parsed.enrichment.concurrency, 8);
        assert_eq!(parsed.libraries.len(), 1);
        assert_eq!(parsed.libraries[0].tag.as_str(), "sophia");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        // Config with only some fields
        let toml = r#"
[credentials]
isbndb_api_key = "my-key"

[[libraries]]
tag = "utokyo"
search_url = "https://opac.example.ac.jp/api/search?isbn="
"#;
        let config: Config = toml::from_str(toml).unwrap();

        // Specified fields are set
        assert_eq!(
            config.credentials.isbndb_api_key,
            Some("my-key".to_string())
        );
        assert_eq!(config.libraries.len(), 1);

        // Other fields use defaults
        assert_eq!(config.enrichment.concurrency, 5);
        assert_eq!(config.enrichment.provider_delay_ms, 1500);
        assert_eq!(config.libraries[0].record_marker, "opac_details");
        assert!(config.catalog.is_none());
    }
}
