//! Adapter layer: Convert Google Books DTOs to domain models

use super::dto;
use crate::enrichment::domain::{BibData, EnrichmentError};

/// Pick the first volume out of a search response and convert it.
pub fn to_bib(response: dto::VolumesResponse) -> Result<BibData, EnrichmentError> {
    let volume = response
        .items
        .into_iter()
        .next()
        .ok_or(EnrichmentError::NotFound)?;

    let info = volume.volume_info;
    let authors: Vec<String> = info
        .authors
        .into_iter()
        .filter(|a| !a.trim().is_empty())
        .collect();

    Ok(BibData {
        title: info.title.filter(|s| !s.is_empty()),
        author: if authors.is_empty() {
            None
        } else {
            Some(authors.join(", "))
        },
        publisher: info.publisher.filter(|s| !s.is_empty()),
        published_date: info.published_date.filter(|s| !s.is_empty()),
        description: info.description.filter(|s| !s.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(title: &str) -> dto::Volume {
        dto::Volume {
            volume_info: dto::VolumeInfo {
                title: Some(title.to_string()),
                authors: vec!["Natsume Soseki".to_string()],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_first_volume_wins() {
        let bib = to_bib(dto::VolumesResponse {
            total_items: 2,
            items: vec![volume("Kokoro"), volume("Kokoro (Annotated)")],
        })
        .unwrap();

        assert_eq!(bib.title.as_deref(), Some("Kokoro"));
        assert_eq!(bib.author.as_deref(), Some("Natsume Soseki"));
    }

    #[test]
    fn test_zero_items_is_not_found() {
        let result = to_bib(dto::VolumesResponse {
            total_items: 0,
            items: vec![],
        });
        assert!(matches!(result, Err(EnrichmentError::NotFound)));
    }
}
