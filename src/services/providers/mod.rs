//! Catalog provider abstraction
//!
//! The recommendation core never reads storage itself. Providers hand it the
//! full list of title records; the CSV provider mirrors the catalog export the
//! engine was built around and the in-memory provider serves embedding
//! applications and tests.

use crate::{error::AppResult, models::TitleRecord};

pub mod csv;
pub mod memory;

pub use self::csv::CsvCatalogProvider;
pub use self::memory::InMemoryCatalogProvider;

/// Trait for catalog sources
///
/// Implementations return every row of the catalog in source order. Records
/// may be returned raw; the snapshot normalizes them before use.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Load the complete catalog
    async fn load_catalog(&self) -> AppResult<Vec<TitleRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
