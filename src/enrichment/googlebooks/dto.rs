//! Google Books API Data Transfer Objects
//!
//! These types match EXACTLY what the volumes API returns.
//! DO NOT use these types outside the googlebooks module - convert to
//! domain types.
//!
//! API Reference: https://developers.google.com/books/docs/v1/using
//!
//! Example response:
//! ```json
//! {
//!   "totalItems": 1,
//!   "items": [{
//!     "volumeInfo": {
//!       "title": "Kokoro",
//!       "authors": ["Natsume Soseki"],
//!       "publisher": "Penguin",
//!       "publishedDate": "2010-10-26",
//!       "description": "..."
//!     }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level volumes search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    pub total_items: u32,
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Volume {
    #[serde(rename = "volumeInfo")]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    #[serde(rename = "publishedDate")]
    pub published_date: Option<String>,
    pub description: Option<String>,
}
