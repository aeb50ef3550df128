//! ISBNdb API Data Transfer Objects
//!
//! These types match EXACTLY what the ISBNdb v2 API returns.
//! DO NOT use these types outside the isbndb module - convert to domain types.
//!
//! API Reference: https://isbndb.com/apidocs/v2
//!
//! Example response:
//! ```json
//! {
//!   "book": {
//!     "title": "Great Expectations",
//!     "authors": ["Charles Dickens"],
//!     "publisher": "Penguin Classics",
//!     "date_published": "2002-12-31",
//!     "synopsis": "..."
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level lookup response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookResponse {
    pub book: Book,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Book {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub date_published: Option<String>,
    pub synopsis: Option<String>,
    /// Some records carry the blurb here instead of `synopsis`
    pub overview: Option<String>,
}

/// Error body on non-2xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    #[serde(rename = "errorMessage")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_book() {
        let json = r#"{
            "book": {
                "title": "Great Expectations",
                "authors": ["Charles Dickens"],
                "publisher": "Penguin Classics",
                "date_published": "2002-12-31"
            }
        }"#;

        let response: BookResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.book.title.as_deref(), Some("Great Expectations"));
        assert_eq!(response.book.authors, vec!["Charles Dickens"]);
        assert_eq!(response.book.synopsis, None);
    }

    #[test]
    fn test_deserialize_error() {
        let json = r#"{ "errorMessage": "Not Found" }"#;
        let error: ApiError = serde_json::from_str(json).unwrap();
        assert_eq!(error.message, "Not Found");
    }
}
