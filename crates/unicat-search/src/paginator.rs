//! Merge-and-fill pagination across the SELLER and GLOBAL catalogs.
//!
//! Every page is filled seller-first: up to `page_size` seller items at the
//! page's natural offset, then the shortfall from the global catalog at the
//! offset computed by [`fill_window`]. The combined page is NOT re-sorted.
//! Each block is ordered by its own catalog, so a price-sorted page reads
//! "seller items cheapest-first, then global items cheapest-first". This is
//! a placement policy favouring first-party listings, not a ranked merge.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use unicat_core::{normalize, ProductId, Source, UnifiedProduct};

use crate::adapter::{CatalogAdapter, CatalogError};
use crate::offsets::{fill_window, has_next_page};
use crate::query::{CatalogFilter, CatalogSort, SortKey};

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on raw records scanned per catalog per page, as a multiple of
/// the number of products wanted. Stops runaway scans over malformed data.
pub const SCAN_MULTIPLIER: usize = 3;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The SELLER catalog failed, or the catalog holding a looked-up product
    /// failed. GLOBAL failures during search degrade instead.
    #[error(transparent)]
    CatalogUnavailable(#[from] CatalogError),
}

/// One page of merged results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Seller block followed by global fill.
    pub combined: Vec<UnifiedProduct>,
    pub seller_count: usize,
    pub global_count: usize,
    /// Seller matches plus global matches, regardless of what fit here.
    pub total: u64,
    pub has_next_page: bool,
    /// The global catalog failed; this page holds seller items only.
    pub partial: bool,
}

impl SearchPage {
    /// The page returned for a blank query.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            combined: Vec::new(),
            seller_count: 0,
            global_count: 0,
            total: 0,
            has_next_page: false,
            partial: false,
        }
    }
}

/// Normalized products from one catalog slice.
struct Slice {
    products: Vec<UnifiedProduct>,
    total: u64,
}

/// Searches both catalogs and assembles seller-priority pages.
///
/// Catalog adapters are injected by the owning service; the paginator keeps
/// no state between calls.
#[derive(Clone)]
pub struct Paginator {
    seller: Arc<dyn CatalogAdapter>,
    global: Arc<dyn CatalogAdapter>,
    page_size: usize,
}

impl std::fmt::Debug for Paginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("seller", &self.seller.source())
            .field("global", &self.global.source())
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Paginator {
    /// Builds a paginator. A `page_size` of zero is raised to one.
    #[must_use]
    pub fn new(
        seller: Arc<dyn CatalogAdapter>,
        global: Arc<dyn CatalogAdapter>,
        page_size: usize,
    ) -> Self {
        Self {
            seller,
            global,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Searches both catalogs for `query` and returns page `page` (1-based).
    ///
    /// A blank query returns [`SearchPage::empty`] without touching either
    /// catalog. On page one the global fill always starts at offset zero, so
    /// the seller and global row reads run concurrently. On later pages the
    /// fill offset depends on the seller total: the seller read runs
    /// alongside a global count, and the fill read follows.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::CatalogUnavailable`] when the SELLER catalog
    /// fails. A GLOBAL failure yields a seller-only page with `partial` set.
    pub async fn search(
        &self,
        query: &str,
        sort_key: SortKey,
        page: u32,
    ) -> Result<SearchPage, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchPage::empty());
        }

        let page = page.max(1);
        let filter = CatalogFilter::search(query);
        let sort = CatalogSort::from(sort_key);
        let seller_offset = fill_window(page, self.page_size, 0).seller_offset;
        let first_page = seller_offset == 0;

        let global_read = async {
            if first_page {
                self.fetch_products(&*self.global, &filter, sort, 0, self.page_size)
                    .await
            } else {
                self.global
                    .query(&filter, sort, 0, 0)
                    .await
                    .map(|count| Slice {
                        products: Vec::new(),
                        total: count.total_matching,
                    })
            }
        };

        let (seller, global_read) = tokio::join!(
            self.fetch_products(&*self.seller, &filter, sort, seller_offset, self.page_size),
            global_read,
        );

        let seller = seller.inspect_err(|e| {
            tracing::error!(
                source = %Source::Seller,
                query,
                sort = %sort_key,
                page,
                error = %e,
                "seller catalog query failed; failing search"
            );
        })?;

        let shortfall = self.page_size.saturating_sub(seller.products.len());
        let global = match global_read {
            Ok(mut prefetched) if first_page => {
                prefetched.products.truncate(shortfall);
                Ok(prefetched)
            }
            Ok(counted) if shortfall == 0 => Ok(counted),
            Ok(_) => {
                let window = fill_window(page, self.page_size, seller.total);
                self.fetch_products(&*self.global, &filter, sort, window.global_offset, shortfall)
                    .await
            }
            Err(e) => Err(e),
        };

        let page_result = match global {
            Ok(global) => self.assemble(page, seller, global, false),
            Err(e) => {
                tracing::warn!(
                    source = %Source::Global,
                    query,
                    sort = %sort_key,
                    page,
                    error = %e,
                    "global catalog query failed; serving seller-only page"
                );
                let empty = Slice {
                    products: Vec::new(),
                    total: 0,
                };
                self.assemble(page, seller, empty, true)
            }
        };

        tracing::debug!(
            query,
            sort = %sort_key,
            page,
            seller_count = page_result.seller_count,
            global_count = page_result.global_count,
            total = page_result.total,
            partial = page_result.partial,
            "search page assembled"
        );
        Ok(page_result)
    }

    /// Lists enabled SELLER products, with the same page shape as
    /// [`Paginator::search`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::CatalogUnavailable`] when the SELLER catalog
    /// fails.
    pub async fn list(&self, sort_key: SortKey, page: u32) -> Result<SearchPage, SearchError> {
        let page = page.max(1);
        let filter = CatalogFilter::listing();
        let offset = fill_window(page, self.page_size, 0).seller_offset;

        let seller = self
            .fetch_products(&*self.seller, &filter, sort_key.into(), offset, self.page_size)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    source = %Source::Seller,
                    sort = %sort_key,
                    page,
                    error = %e,
                    "seller catalog listing failed"
                );
            })?;

        let empty = Slice {
            products: Vec::new(),
            total: 0,
        };
        Ok(self.assemble(page, seller, empty, false))
    }

    /// Loads one product by id from whichever catalog owns it.
    ///
    /// Records that fail normalization are reported as missing.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::CatalogUnavailable`] when the owning catalog
    /// fails.
    pub async fn find(&self, id: ProductId) -> Result<Option<UnifiedProduct>, SearchError> {
        let adapter = match id.source() {
            Source::Seller => &self.seller,
            Source::Global => &self.global,
        };

        let Some(record) = adapter.fetch(id.numeric_id()).await.inspect_err(|e| {
            tracing::error!(product_id = %id, error = %e, "product lookup failed");
        })?
        else {
            return Ok(None);
        };

        match normalize(record) {
            Ok(product) => Ok(Some(product)),
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "stored product failed normalization");
                Ok(None)
            }
        }
    }

    /// Pings both catalogs concurrently; results are `(seller, global)`.
    pub async fn check_catalogs(&self) -> (Result<(), CatalogError>, Result<(), CatalogError>) {
        tokio::join!(self.seller.ping(), self.global.ping())
    }

    fn assemble(&self, page: u32, seller: Slice, global: Slice, partial: bool) -> SearchPage {
        let seller_count = seller.products.len();
        let global_count = global.products.len();
        let total = seller.total + global.total;

        let mut combined = seller.products;
        combined.extend(global.products);

        SearchPage {
            combined,
            seller_count,
            global_count,
            total,
            has_next_page: has_next_page(page, self.page_size, total),
            partial,
        }
    }

    /// Reads `want` normalized products from `adapter` starting at `offset`.
    ///
    /// Records that fail normalization are logged and skipped, and further
    /// records are pulled to make up for them, up to `want * SCAN_MULTIPLIER`
    /// raw records in total. A short result means the catalog ran out or the
    /// scan budget was spent.
    async fn fetch_products(
        &self,
        adapter: &dyn CatalogAdapter,
        filter: &CatalogFilter,
        sort: CatalogSort,
        offset: u64,
        want: usize,
    ) -> Result<Slice, CatalogError> {
        let budget = want * SCAN_MULTIPLIER;
        let mut products = Vec::with_capacity(want);
        let mut scanned = 0_usize;
        let mut next_offset = offset;
        let mut total = None;

        loop {
            let limit = (want - products.len()).min(budget - scanned);
            let batch = adapter.query(filter, sort, next_offset, limit as u64).await?;
            total.get_or_insert(batch.total_matching);

            let fetched = batch.items.len();
            scanned += fetched;
            next_offset += fetched as u64;

            for record in batch.items {
                match normalize(record) {
                    Ok(product) => products.push(product),
                    Err(e) => tracing::warn!(
                        source = %adapter.source(),
                        error = %e,
                        "skipping malformed catalog record"
                    ),
                }
            }

            if products.len() >= want || fetched < limit || scanned >= budget {
                break;
            }
        }

        if products.len() < want && scanned >= budget {
            tracing::warn!(
                source = %adapter.source(),
                wanted = want,
                got = products.len(),
                scanned,
                "scan budget exhausted; returning short slice"
            );
        }

        products.truncate(want);
        Ok(Slice {
            products,
            total: total.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
#[path = "paginator_test.rs"]
mod tests;
