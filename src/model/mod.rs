//! Core data models for the book collection.
//!
//! Defines the primary entities: [`Identifier`], [`BookRecord`], and the
//! JSON [`Snapshot`] the CLI reads and writes. Records travel through the
//! enrichment pipeline by value; enrichment produces updated copies and the
//! caller only ever sees the merged result.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enrichment::domain::LookupStatus;

/// A book identifier as harvested by the discovery stage.
///
/// ISBNs are stored without separators. Anything that is not a plausible
/// ISBN shape is kept verbatim as a vendor catalog code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Identifier {
    Isbn10(String),
    Isbn13(String),
    /// Vendor-specific catalog code (not an ISBN)
    VendorCode(String),
}

impl Identifier {
    /// Classify a raw identifier string.
    ///
    /// Hyphens and spaces are stripped before shape checks. No checksum
    /// validation happens here; provider adapters receive identifiers as-is.
    pub fn parse(raw: &str) -> Self {
        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, '-' | ' '))
            .collect::<String>()
            .to_uppercase();

        // Byte slicing below is only safe on all-ASCII input
        if !compact.is_ascii() {
            return Self::VendorCode(raw.trim().to_string());
        }

        let is_isbn13 = compact.len() == 13
            && compact.chars().all(|c| c.is_ascii_digit())
            && (compact.starts_with("978") || compact.starts_with("979"));
        if is_isbn13 {
            return Self::Isbn13(compact);
        }

        let is_isbn10 = compact.len() == 10
            && compact[..9].chars().all(|c| c.is_ascii_digit())
            && compact[9..].chars().all(|c| c.is_ascii_digit() || c == 'X');
        if is_isbn10 {
            return Self::Isbn10(compact);
        }

        Self::VendorCode(raw.trim().to_string())
    }

    /// Whether this identifier is an ISBN (either length).
    pub fn is_isbn(&self) -> bool {
        matches!(self, Self::Isbn10(_) | Self::Isbn13(_))
    }

    /// ISBN-13 form of this identifier, converting from ISBN-10 when needed.
    ///
    /// Vendor codes have no ISBN form.
    pub fn as_isbn13(&self) -> Option<String> {
        match self {
            Self::Isbn13(s) => Some(s.clone()),
            Self::Isbn10(s) => {
                let prefixed = format!("978{}", &s[..9]);
                let check = isbn13_check_digit(&prefixed)?;
                Some(format!("{prefixed}{check}"))
            }
            Self::VendorCode(_) => None,
        }
    }

    /// ISBN-10 form, only derivable from the 978 EAN prefix.
    pub fn as_isbn10(&self) -> Option<String> {
        match self {
            Self::Isbn10(s) => Some(s.clone()),
            Self::Isbn13(s) if s.starts_with("978") => {
                let body = &s[3..12];
                let check = isbn10_check_digit(body)?;
                Some(format!("{body}{check}"))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isbn10(s) | Self::Isbn13(s) => write!(f, "{s}"),
            Self::VendorCode(c) => write!(f, "{c}"),
        }
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::VendorCode(String::new())
    }
}

/// Weighted-sum check digit for a 12-digit ISBN-13 body.
fn isbn13_check_digit(digits: &str) -> Option<char> {
    let mut sum = 0;
    for (i, c) in digits.chars().enumerate() {
        let d = c.to_digit(10)?;
        sum += if i % 2 == 0 { d } else { d * 3 };
    }
    char::from_digit((10 - sum % 10) % 10, 10)
}

/// Mod-11 check digit for a 9-digit ISBN-10 body (10 = 'X').
fn isbn10_check_digit(digits: &str) -> Option<char> {
    let mut sum = 0;
    for (i, c) in digits.chars().enumerate() {
        sum += c.to_digit(10)? * (10 - i as u32);
    }
    match (11 - sum % 11) % 11 {
        10 => Some('X'),
        d => char::from_digit(d, 10),
    }
}

/// Tag naming one physical library (e.g. `sophia`, `utokyo`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryTag(String);

impl LibraryTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LibraryTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

/// A single book record flowing through the enrichment pipeline.
///
/// `key` is the record's identity (source URL or catalog key) and is never
/// changed by enrichment. Holding flags are per-library and independent:
/// `None` means the library was never checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRecord {
    /// Identity key (source URL or catalog key)
    pub key: String,
    /// Book identifier
    pub identifier: Identifier,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    /// Per-library holding flags (None = not yet checked)
    pub holdings: BTreeMap<LibraryTag, Option<bool>>,
    /// Per-library OPAC record links
    pub opac_links: BTreeMap<LibraryTag, String>,
    /// Which providers have been tried, and with what outcome
    pub lookup: LookupStatus,
    /// Error annotation from a failed per-record task, if any
    pub error: Option<String>,
}

impl BookRecord {
    /// Create an empty record for an identifier, keyed by `key`.
    pub fn new(key: impl Into<String>, identifier: Identifier) -> Self {
        Self {
            key: key.into(),
            identifier,
            ..Default::default()
        }
    }

    /// Whether any bibliographic field is already populated.
    pub fn has_bib_fields(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.publisher,
            &self.published_date,
            &self.description,
        ]
        .iter()
        .any(|f| f.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// The recorded holding flag for a library (None = not yet checked).
    pub fn holding(&self, tag: &LibraryTag) -> Option<bool> {
        self.holdings.get(tag).copied().flatten()
    }
}

/// Serialized batch format used at the CLI boundary.
///
/// The discovery stage exports this shape; we read it, enrich `books`, and
/// write it back with `enriched_at` stamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// RFC 3339 time the discovery stage exported the batch
    pub exported_at: Option<String>,
    /// RFC 3339 time enrichment last completed
    pub enriched_at: Option<String>,
    pub books: Vec<BookRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_isbn13() {
        let id = Identifier::parse("978-4-10-109205-8");
        assert_eq!(id, Identifier::Isbn13("9784101092058".to_string()));
        assert!(id.is_isbn());
    }

    #[test]
    fn test_parse_isbn10() {
        let id = Identifier::parse("4101092052");
        assert_eq!(id, Identifier::Isbn10("4101092052".to_string()));

        // Trailing X check digit is valid for ISBN-10
        let id = Identifier::parse("080442957X");
        assert_eq!(id, Identifier::Isbn10("080442957X".to_string()));
    }

    #[test]
    fn test_parse_vendor_code() {
        let id = Identifier::parse("BW-1234567");
        assert_eq!(id, Identifier::VendorCode("BW-1234567".to_string()));
        assert!(!id.is_isbn());
        assert_eq!(id.as_isbn13(), None);
    }

    #[test]
    fn test_isbn10_to_isbn13() {
        let id = Identifier::Isbn10("4101010137".to_string());
        assert_eq!(id.as_isbn13(), Some("9784101010137".to_string()));
    }

    #[test]
    fn test_isbn13_to_isbn10() {
        let id = Identifier::Isbn13("9784101010137".to_string());
        assert_eq!(id.as_isbn10(), Some("4101010137".to_string()));

        // 979-prefixed ISBNs have no ISBN-10 form
        let id = Identifier::Isbn13("9791234567896".to_string());
        assert_eq!(id.as_isbn10(), None);
    }

    #[test]
    fn test_has_bib_fields() {
        let mut record =
            BookRecord::new("https://example.com/books/1", Identifier::parse("4101010137"));
        assert!(!record.has_bib_fields());

        // Empty strings don't count as populated
        record.title = Some(String::new());
        assert!(!record.has_bib_fields());

        record.title = Some("Kokoro".to_string());
        assert!(record.has_bib_fields());
    }

    #[test]
    fn test_holding_flag_states() {
        let mut record = BookRecord::new("key-1", Identifier::parse("9784101010137"));
        let sophia = LibraryTag::from("sophia");

        assert_eq!(record.holding(&sophia), None);

        record.holdings.insert(sophia.clone(), Some(true));
        assert_eq!(record.holding(&sophia), Some(true));
    }

    #[test]
    fn test_record_roundtrip_json() {
        let mut record = BookRecord::new(
            "https://example.com/books/42",
            Identifier::parse("9784101010137"),
        );
        record.title = Some("Kokoro".to_string());
        record
            .holdings
            .insert(LibraryTag::from("utokyo"), Some(false));

        let json = serde_json::to_string(&record).unwrap();
        let parsed: BookRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.key, record.key);
        assert_eq!(parsed.identifier, record.identifier);
        assert_eq!(parsed.title, record.title);
        assert_eq!(parsed.holding(&LibraryTag::from("utokyo")), Some(false));
    }
}
