//! Locale routing for bibliographic providers.
//!
//! Japanese publications are far better covered by NDL than by the western
//! aggregators, and vice versa, so the sequential fallback chain is ordered
//! by where the book was published. Classification is a pure function of the
//! identifier: the ISBN registration group `4` is Japan.

use crate::enrichment::domain::ProviderKind;
use crate::model::Identifier;

/// Publication locale of a book, derived from its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookLocale {
    /// Japanese registration group (ISBN group 4)
    Domestic,
    /// Everything else, including vendor catalog codes
    Foreign,
}

/// Classify an identifier. Total over all identifier shapes; vendor codes
/// are always Foreign.
pub fn classify(identifier: &Identifier) -> BookLocale {
    match identifier {
        Identifier::Isbn10(s) if s.starts_with('4') => BookLocale::Domestic,
        Identifier::Isbn13(s) if s.starts_with("9784") => BookLocale::Domestic,
        _ => BookLocale::Foreign,
    }
}

/// Providers tried one record at a time, before locale ordering.
const SEQUENTIAL_PROVIDERS: [ProviderKind; 3] = [
    ProviderKind::Ndl,
    ProviderKind::Isbndb,
    ProviderKind::GoogleBooks,
];

/// Rank for providers outside the interchangeable NDL/ISBNdb pair. They are
/// tried last, in their declaration order (the sort below is stable).
const LOWEST_PRIORITY: u8 = u8::MAX;

/// Priority of a provider for a locale; lower ranks are tried first.
///
/// Keyed by the provider enum rather than its display name, so renaming a
/// provider cannot silently reorder the chain.
pub fn priority(provider: ProviderKind, locale: BookLocale) -> u8 {
    match (provider, locale) {
        (ProviderKind::Ndl, BookLocale::Domestic) => 0,
        (ProviderKind::Isbndb, BookLocale::Domestic) => 1,
        (ProviderKind::Isbndb, BookLocale::Foreign) => 0,
        (ProviderKind::Ndl, BookLocale::Foreign) => 1,
        _ => LOWEST_PRIORITY,
    }
}

/// The sequential provider chain for a locale, in try order.
///
/// Uses a stable sort so equal-priority providers keep their declaration
/// order and the chain is deterministic across runs.
pub fn ordered_providers(locale: BookLocale) -> Vec<ProviderKind> {
    let mut chain = SEQUENTIAL_PROVIDERS.to_vec();
    chain.sort_by_key(|p| priority(*p, locale));
    chain
}
