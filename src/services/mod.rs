// Service exports
pub mod catalog;

pub use catalog::{Catalog, CatalogError, CatalogStore, parse_catalog, spawn_periodic_refresh};
