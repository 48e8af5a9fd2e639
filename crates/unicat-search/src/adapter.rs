//! The read-only query capability each catalog provides.

use async_trait::async_trait;
use thiserror::Error;
use unicat_core::{RawRecord, Source};

use crate::query::{CatalogFilter, CatalogSort, SortKey};

/// A catalog could not answer a query.
///
/// Timeouts and retries are the adapter's business; by the time this error
/// reaches the paginator the adapter has given up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{catalog} catalog unavailable: {reason}")]
    Unavailable { catalog: Source, reason: String },
}

impl CatalogError {
    pub fn unavailable(catalog: Source, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            catalog,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Source {
        match self {
            Self::Unavailable { catalog, .. } => *catalog,
        }
    }
}

/// One slice of raw records plus the catalog's total match count for the
/// same filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<RawRecord>,
    pub total_matching: u64,
}

/// Read access to one catalog store.
///
/// Implementations apply the filter, sort and offset/limit natively. Within
/// equal sort values records are ordered by numeric id, descending.
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Which catalog this adapter reads.
    fn source(&self) -> Source;

    /// Returns up to `limit` records starting at `offset`, and the total
    /// number of records matching `filter`. `limit = 0` only counts.
    async fn query(
        &self,
        filter: &CatalogFilter,
        sort: CatalogSort,
        offset: u64,
        limit: u64,
    ) -> Result<CatalogPage, CatalogError>;

    /// Loads a single record by its numeric id, ignoring the enabled flag.
    async fn fetch(&self, numeric_id: u64) -> Result<Option<RawRecord>, CatalogError>;

    /// Cheap liveness check used by health checks. Defaults to a count-only
    /// listing query.
    async fn ping(&self) -> Result<(), CatalogError> {
        self.query(&CatalogFilter::listing(), SortKey::Latest.into(), 0, 0)
            .await
            .map(|_| ())
    }
}
