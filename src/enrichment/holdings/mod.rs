//! Physical-library holdings lookups.
//!
//! Two source shapes augment already-enriched records with per-library
//! holding flags:
//!
//! - [`OpacClient`]: an asynchronous catalog API per library, with a
//!   redirect-resolution fallback for OPACs whose structured search misses
//!   records the link resolver still knows.
//! - [`JsonFileCatalog`] / [`LoadedCatalog`]: a pre-extracted identifier
//!   set checked synchronously, for collections that publish holdings as
//!   documents instead of an API.
//!
//! Holding flags are per-library and independent; nothing here ever touches
//! another library's flag.

mod catalog;
mod opac;

pub use catalog::{JsonFileCatalog, LoadedCatalog, StaticCatalog};
pub use opac::{OpacClient, OpacEndpoint};
