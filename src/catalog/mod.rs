pub mod snapshot;
pub mod store;

pub use snapshot::CatalogSnapshot;
pub use store::CatalogStore;
