//! NDL Search API Data Transfer Objects
//!
//! The NDL OpenSearch endpoint answers RSS 2.0 with Dublin Core extensions;
//! these types match that feed EXACTLY and never leave this module.
//! quick-xml's serde deserializer strips namespace prefixes, so the
//! `dc:`/`dcndl:` feed elements are matched by their local names.
//!
//! API Reference: https://ndlsearch.ndl.go.jp/help/api/specifications
//!
//! Example item:
//! ```xml
//! <item>
//!   <title>こころ</title>
//!   <link>https://ndlsearch.ndl.go.jp/books/R100000002-I000002149526</link>
//!   <dc:creator>夏目漱石 著</dc:creator>
//!   <dc:publisher>新潮社</dc:publisher>
//!   <dc:date>2004</dc:date>
//! </item>
//! ```

use serde::Deserialize;

/// Feed root. quick-xml maps the document element regardless of its name.
#[derive(Debug, Deserialize)]
pub struct Rss {
    pub channel: Channel,
}

#[derive(Debug, Deserialize)]
pub struct Channel {
    #[serde(rename = "item", default)]
    pub items: Vec<Item>,
}

/// One catalog record. Unknown feed elements are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Repeated once per creator
    #[serde(rename = "creator", default)]
    pub creators: Vec<String>,
    #[serde(rename = "publisher", default)]
    pub publishers: Vec<String>,
    #[serde(rename = "date", default)]
    pub date: Option<String>,
}
