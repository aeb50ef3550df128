//! NDL (National Diet Library) search lookup.
//!
//! First choice for domestically published books; the NDL catalog covers
//! essentially everything with a Japanese ISBN registration.

mod adapter;
mod client;
mod dto;

pub use client::NdlClient;
