//! Seller-priority search across the SELLER and GLOBAL catalogs.
//!
//! [`Paginator`] queries both catalogs through [`CatalogAdapter`]s, runs each
//! raw record through [`unicat_core::normalize`], and places the seller block
//! ahead of the global fill on every page.

pub mod adapter;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod offsets;
pub mod paginator;
pub mod query;

pub use adapter::{CatalogAdapter, CatalogError, CatalogPage};
#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryCatalog;
pub use offsets::{fill_window, has_next_page, FillWindow};
pub use paginator::{Paginator, SearchError, SearchPage, DEFAULT_PAGE_SIZE, SCAN_MULTIPLIER};
pub use query::{CatalogFilter, CatalogSort, SortDirection, SortField, SortKey, UnknownSortKey};
