//! Reward store catalog (append-only, index-addressed).
//!
//! Pure domain logic only: no IO, no locking, no logging.

pub mod catalog;

pub use catalog::{CatalogEntry, StoreCatalog};
