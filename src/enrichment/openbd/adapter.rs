//! Adapter layer: Convert OpenBD DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.
//! If OpenBD changes their response format, only this file and dto.rs
//! need to change.

use std::collections::HashMap;

use super::dto;
use crate::enrichment::domain::BibData;
use crate::enrichment::traits::BulkHit;
use crate::model::Identifier;

/// Align response slots back to the requested identifiers.
///
/// The response array is positionally aligned with the request, but we key
/// by the ISBN each slot reports instead - that survives providers that
/// reorder or drop slots, and the summary always carries the ISBN-13.
pub fn to_bulk_hits(
    requested: &[Identifier],
    slots: Vec<Option<dto::BookEntry>>,
) -> Vec<BulkHit> {
    let mut by_isbn: HashMap<String, BibData> = slots
        .into_iter()
        .flatten()
        .map(|entry| (entry.summary.isbn.clone(), to_bib(entry)))
        .collect();

    requested
        .iter()
        .map(|identifier| {
            let bib = identifier
                .as_isbn13()
                .and_then(|isbn| by_isbn.remove(&isbn));
            BulkHit {
                identifier: identifier.clone(),
                bib,
            }
        })
        .collect()
}

/// Convert one response slot to bibliographic fields.
fn to_bib(entry: dto::BookEntry) -> BibData {
    let description = entry
        .onix
        .and_then(|onix| onix.collateral_detail)
        .and_then(|detail| {
            detail
                .text_content
                .into_iter()
                .find(|tc| tc.text_type == "03" && !tc.text.is_empty())
        })
        .map(|tc| tc.text);

    let summary = entry.summary;
    BibData {
        title: non_empty(summary.title),
        author: non_empty(summary.author),
        publisher: non_empty(summary.publisher),
        published_date: non_empty(summary.pubdate),
        description,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(isbn: &str, title: &str) -> dto::BookEntry {
        dto::BookEntry {
            summary: dto::Summary {
                isbn: isbn.to_string(),
                title: title.to_string(),
                author: "夏目漱石／著".to_string(),
                publisher: "新潮社".to_string(),
                pubdate: "2004-03".to_string(),
                ..Default::default()
            },
            onix: None,
        }
    }

    #[test]
    fn test_hits_align_with_request_order() {
        let requested = vec![
            Identifier::parse("9784101010137"),
            Identifier::parse("9780141439518"),
        ];
        // Response arrives in the opposite order; keying by ISBN still aligns
        let slots = vec![
            Some(entry("9780141439518", "Great Expectations")),
            Some(entry("9784101010137", "こころ")),
        ];

        let hits = to_bulk_hits(&requested, slots);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].identifier, requested[0]);
        assert_eq!(
            hits[0].bib.as_ref().unwrap().title.as_deref(),
            Some("こころ")
        );
        assert_eq!(
            hits[1].bib.as_ref().unwrap().title.as_deref(),
            Some("Great Expectations")
        );
    }

    #[test]
    fn test_null_slot_becomes_miss() {
        let requested = vec![
            Identifier::parse("9784101010137"),
            Identifier::parse("9784003101018"),
        ];
        let slots = vec![Some(entry("9784101010137", "こころ")), None];

        let hits = to_bulk_hits(&requested, slots);

        assert!(hits[0].bib.is_some());
        assert!(hits[1].bib.is_none());
    }

    #[test]
    fn test_isbn10_request_matches_isbn13_slot() {
        // The provider answers in ISBN-13 even when we hold an ISBN-10
        let requested = vec![Identifier::parse("4101010137")];
        let slots = vec![Some(entry("9784101010137", "こころ"))];

        let hits = to_bulk_hits(&requested, slots);
        assert!(hits[0].bib.is_some());
    }

    #[test]
    fn test_empty_summary_fields_become_none() {
        let mut e = entry("9784101010137", "");
        e.summary.author = String::new();

        let requested = vec![Identifier::parse("9784101010137")];
        let hits = to_bulk_hits(&requested, vec![Some(e)]);

        let bib = hits[0].bib.as_ref().unwrap();
        assert_eq!(bib.title, None);
        assert_eq!(bib.author, None);
        assert_eq!(bib.publisher.as_deref(), Some("新潮社"));
    }

    #[test]
    fn test_onix_description_extracted() {
        let mut e = entry("9784101010137", "こころ");
        e.onix = Some(dto::Onix {
            collateral_detail: Some(dto::CollateralDetail {
                text_content: vec![
                    dto::TextContent {
                        text_type: "02".to_string(),
                        text: "短い紹介".to_string(),
                    },
                    dto::TextContent {
                        text_type: "03".to_string(),
                        text: "長い内容紹介".to_string(),
                    },
                ],
            }),
        });

        let requested = vec![Identifier::parse("9784101010137")];
        let hits = to_bulk_hits(&requested, vec![Some(e)]);

        assert_eq!(
            hits[0].bib.as_ref().unwrap().description.as_deref(),
            Some("長い内容紹介")
        );
    }
}
