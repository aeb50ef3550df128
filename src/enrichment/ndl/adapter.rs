//! Adapter layer: Convert NDL feed DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{BibData, EnrichmentError};

/// Pick the first catalog record out of a feed and convert it.
///
/// An empty feed is the provider's "no record" answer.
pub fn to_bib(feed: dto::Rss) -> Result<BibData, EnrichmentError> {
    let item = feed
        .channel
        .items
        .into_iter()
        .next()
        .ok_or(EnrichmentError::NotFound)?;

    let bib = BibData {
        title: item.title.filter(|s| !s.is_empty()),
        author: join_names(item.creators),
        publisher: join_names(item.publishers),
        published_date: item.date.filter(|s| !s.is_empty()),
        description: item.description.filter(|s| !s.is_empty()),
    };

    // A record shell with no usable fields is as good as a miss
    if bib.is_empty() {
        return Err(EnrichmentError::NotFound);
    }

    Ok(bib)
}

/// Join repeated feed elements, dropping role suffixes NDL appends to
/// creator names ("夏目漱石 著" -> "夏目漱石").
fn join_names(values: Vec<String>) -> Option<String> {
    let cleaned: Vec<String> = values
        .into_iter()
        .map(|v| strip_role_suffix(&v))
        .filter(|v| !v.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(", "))
    }
}

const ROLE_SUFFIXES: [&str; 4] = ["著", "編", "訳", "監修"];

fn strip_role_suffix(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches(',');
    for role in ROLE_SUFFIXES {
        if let Some(stripped) = trimmed.strip_suffix(role) {
            return stripped.trim().to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(items: Vec<dto::Item>) -> dto::Rss {
        dto::Rss {
            channel: dto::Channel { items },
        }
    }

    #[test]
    fn test_first_item_wins() {
        let result = to_bib(feed(vec![
            dto::Item {
                title: Some("こころ".to_string()),
                creators: vec!["夏目漱石 著".to_string()],
                publishers: vec!["新潮社".to_string()],
                date: Some("2004".to_string()),
                ..Default::default()
            },
            dto::Item {
                title: Some("こころ 改版".to_string()),
                ..Default::default()
            },
        ]))
        .unwrap();

        assert_eq!(result.title.as_deref(), Some("こころ"));
        assert_eq!(result.author.as_deref(), Some("夏目漱石"));
        assert_eq!(result.publisher.as_deref(), Some("新潮社"));
        assert_eq!(result.published_date.as_deref(), Some("2004"));
    }

    #[test]
    fn test_empty_feed_is_not_found() {
        let result = to_bib(feed(vec![]));
        assert!(matches!(result, Err(EnrichmentError::NotFound)));
    }

    #[test]
    fn test_field_less_item_is_not_found() {
        let result = to_bib(feed(vec![dto::Item::default()]));
        assert!(matches!(result, Err(EnrichmentError::NotFound)));
    }

    #[test]
    fn test_multiple_creators_joined() {
        let result = to_bib(feed(vec![dto::Item {
            creators: vec!["著者A 著".to_string(), "著者B 訳".to_string()],
            ..Default::default()
        }]))
        .unwrap();

        assert_eq!(result.author.as_deref(), Some("著者A, 著者B"));
        assert_eq!(result.title, None);
    }
}
