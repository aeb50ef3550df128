//! Book enrichment module - resolves bibliographic metadata and library
//! holdings from external services.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`openbd/dto.rs`, `ndl/dto.rs`, ...) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain models
//! - **Clients** - HTTP clients for external APIs
//! - **Locale router** (`locale.rs`) - Provider priority by publication locale
//! - **Throttle** (`throttle.rs`) - Soft concurrency gate + rate-limit jitter
//! - **Service** - High-level orchestration of the enrichment flow
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test the pipeline against mock providers
//! 3. We can swap providers without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EnrichmentService, EnrichmentConfig};
//!
//! let config = EnrichmentConfig {
//!     isbndb_api_key: "your-api-key".to_string(),
//!     ..Default::default()
//! };
//! let service = EnrichmentService::new(config, endpoints, None)?;
//!
//! let enriched = service.enrich(books).await?;
//! ```

pub mod domain;
pub mod googlebooks;
pub mod holdings;
pub mod isbndb;
pub mod locale;
pub mod ndl;
pub mod openbd;
pub mod service;
pub mod throttle;
pub mod traits;

pub use domain::{BibData, EnrichmentError, LookupOutcome, LookupStatus, ProviderKind};
pub use locale::BookLocale;
pub use service::{EnrichmentConfig, EnrichmentService};
