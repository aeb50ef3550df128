//! ISBNdb single-record lookup.
//!
//! First choice for foreign publications. Requires an API key
//! (https://isbndb.com/apidocs/v2); a missing key is a configuration error
//! caught when the provider set is built.

mod adapter;
mod client;
mod dto;

pub use client::IsbndbClient;
