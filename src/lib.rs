//! SQL index catalog - table resolution over document-store indices
//!
//! This crate maps the index layout of a search engine onto the
//! one-table-per-name model a SQL front end needs:
//! - Resolution of index names, aliases and wildcard patterns
//! - Single-type validation of index mappings
//! - Request-scoped catalogs with host supplied visibility filters
//! - Metadata clients over an in-memory snapshot or the REST `_mapping` API

pub mod utils;

pub mod config;
pub mod index_catalog;
pub mod metadata;

pub use config::CatalogConfig;
pub use index_catalog::{Catalog, EsIndex, GetIndexResult, IndexResolver};
pub use metadata::IndexMetadataClient;
