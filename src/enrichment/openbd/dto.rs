//! OpenBD API Data Transfer Objects
//!
//! These types match EXACTLY what the OpenBD API returns.
//! DO NOT use these types outside the openbd module - convert to domain types.
//!
//! API Reference: https://openbd.jp/spec/
//!
//! Example response (one slot per requested ISBN, `null` for unknown ISBNs):
//! ```json
//! [
//!   {
//!     "summary": {
//!       "isbn": "9784101010137",
//!       "title": "こころ",
//!       "author": "夏目漱石／著",
//!       "publisher": "新潮社",
//!       "pubdate": "2004-03"
//!     },
//!     "onix": { "CollateralDetail": { "TextContent": [ ... ] } }
//!   },
//!   null
//! ]
//! ```

use serde::{Deserialize, Serialize};

/// One non-null response slot.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookEntry {
    pub summary: Summary,
    /// Full ONIX payload; we only read the collateral description out of it
    #[serde(default)]
    pub onix: Option<Onix>,
}

/// Condensed bibliographic summary.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Summary {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub pubdate: String,
    pub series: String,
    pub volume: String,
    pub cover: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Onix {
    #[serde(rename = "CollateralDetail", default)]
    pub collateral_detail: Option<CollateralDetail>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CollateralDetail {
    #[serde(rename = "TextContent", default)]
    pub text_content: Vec<TextContent>,
}

/// ONIX text block; type "03" is the long description.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TextContent {
    #[serde(rename = "TextType", default)]
    pub text_type: String,
    #[serde(rename = "Text", default)]
    pub text: String,
}
