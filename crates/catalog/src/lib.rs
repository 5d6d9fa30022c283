//! Remote catalog client: game metadata, upload listings, upload filtering.
//!
//! The install queue only talks to the catalog through the [`CatalogClient`]
//! trait, so resolution logic stays testable with mocks. [`HttpCatalog`] is
//! the production implementation.

pub mod client;
pub mod filter;

pub use client::{CatalogClient, CatalogError, HttpCatalog};
pub use filter::{
    Platform, UploadsFilterResult, filter_uploads, filtered_uploads, is_probably_external,
    log_upload,
};
