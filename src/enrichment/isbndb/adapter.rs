//! Adapter layer: Convert ISBNdb DTOs to domain models

use super::dto;
use crate::enrichment::domain::BibData;

/// Convert a book response to bibliographic fields.
pub fn to_bib(response: dto::BookResponse) -> BibData {
    let book = response.book;

    let description = book
        .synopsis
        .filter(|s| !s.is_empty())
        .or(book.overview.filter(|s| !s.is_empty()));

    BibData {
        title: book.title.filter(|s| !s.is_empty()),
        author: join_authors(book.authors),
        publisher: book.publisher.filter(|s| !s.is_empty()),
        published_date: book.date_published.filter(|s| !s.is_empty()),
        description,
    }
}

fn join_authors(authors: Vec<String>) -> Option<String> {
    let cleaned: Vec<String> = authors
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let bib = to_bib(dto::BookResponse {
            book: dto::Book {
                title: Some("Great Expectations".to_string()),
                authors: vec!["Charles Dickens".to_string()],
                publisher: Some("Penguin Classics".to_string()),
                date_published: Some("2002-12-31".to_string()),
                synopsis: Some("An orphan's rise.".to_string()),
                overview: None,
            },
        });

        assert_eq!(bib.title.as_deref(), Some("Great Expectations"));
        assert_eq!(bib.author.as_deref(), Some("Charles Dickens"));
        assert_eq!(bib.description.as_deref(), Some("An orphan's rise."));
    }

    #[test]
    fn test_overview_fallback() {
        let bib = to_bib(dto::BookResponse {
            book: dto::Book {
                overview: Some("From the overview field.".to_string()),
                ..Default::default()
            },
        });

        assert_eq!(bib.description.as_deref(), Some("From the overview field."));
        assert_eq!(bib.title, None);
    }

    #[test]
    fn test_multiple_authors_joined() {
        let bib = to_bib(dto::BookResponse {
            book: dto::Book {
                authors: vec![
                    "Neil Gaiman".to_string(),
                    " Terry Pratchett ".to_string(),
                    String::new(),
                ],
                ..Default::default()
            },
        });

        assert_eq!(bib.author.as_deref(), Some("Neil Gaiman, Terry Pratchett"));
    }
}
