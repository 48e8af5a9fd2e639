//! In-process catalog backed by a `Vec`, for tests without Postgres.
//!
//! Compiled for this crate's own tests and, through the `test-util`
//! feature, for dependent crates' tests.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use unicat_core::{GlobalRecord, RawRecord, SellerRecord, Source};

use crate::adapter::{CatalogAdapter, CatalogError, CatalogPage};
use crate::query::{CatalogFilter, CatalogSort, SortDirection, SortField};

/// Column access an in-memory catalog needs to filter and sort its own
/// native record type.
pub trait MemoryRecord: Clone + Send + Sync + Into<RawRecord> {
    const SOURCE: Source;

    fn numeric_id(&self) -> Option<i64>;
    fn name(&self) -> Option<&str>;
    /// Matches the normalizer: a sale price above the list price is ignored.
    fn effective_price(&self) -> i64;
    fn created_at(&self) -> DateTime<Utc>;
}

impl MemoryRecord for SellerRecord {
    const SOURCE: Source = Source::Seller;

    fn numeric_id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    fn effective_price(&self) -> i64 {
        effective_price(self.price, self.sale_price)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl MemoryRecord for GlobalRecord {
    const SOURCE: Source = Source::Global;

    fn numeric_id(&self) -> Option<i64> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    fn effective_price(&self) -> i64 {
        effective_price(self.price, self.sale_price)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn effective_price(price: Option<i64>, sale_price: Option<i64>) -> i64 {
    let price = price.unwrap_or(0);
    sale_price.filter(|sale| *sale <= price).unwrap_or(price)
}

#[derive(Debug, Clone)]
struct Stored<R> {
    record: R,
    enabled: bool,
}

/// A catalog held entirely in memory.
///
/// Counts every `query` call and can be switched into a failing state, which
/// makes it the standard test double for [`crate::Paginator`].
#[derive(Debug)]
pub struct InMemoryCatalog<R> {
    rows: Vec<Stored<R>>,
    failure: Mutex<Option<String>>,
    queries: AtomicUsize,
}

impl<R: MemoryRecord> InMemoryCatalog<R> {
    /// Builds a catalog where every record is enabled.
    #[must_use]
    pub fn new(records: Vec<R>) -> Self {
        Self {
            rows: records
                .into_iter()
                .map(|record| Stored {
                    record,
                    enabled: true,
                })
                .collect(),
            failure: Mutex::new(None),
            queries: AtomicUsize::new(0),
        }
    }

    /// Adds a record hidden by `enabled_only` filters.
    #[must_use]
    pub fn with_disabled(mut self, record: R) -> Self {
        self.rows.push(Stored {
            record,
            enabled: false,
        });
        self
    }

    /// Makes every subsequent call fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.lock_failure() = Some(reason.into());
    }

    /// Number of `query` calls served so far, failed ones included.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }

    fn lock_failure(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.failure
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        match self.lock_failure().as_ref() {
            Some(reason) => Err(CatalogError::unavailable(R::SOURCE, reason.clone())),
            None => Ok(()),
        }
    }

    fn matches(row: &Stored<R>, filter: &CatalogFilter) -> bool {
        if filter.enabled_only && !row.enabled {
            return false;
        }
        match filter.text.as_deref() {
            Some(text) => row
                .record
                .name()
                .is_some_and(|name| name.to_lowercase().contains(&text.to_lowercase())),
            None => true,
        }
    }

    fn compare(a: &R, b: &R, sort: CatalogSort) -> Ordering {
        let by_field = match sort.field {
            SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
            SortField::EffectivePrice => a.effective_price().cmp(&b.effective_price()),
        };
        let by_field = match sort.direction {
            SortDirection::Asc => by_field,
            SortDirection::Desc => by_field.reverse(),
        };
        by_field.then_with(|| b.numeric_id().cmp(&a.numeric_id()))
    }
}

#[async_trait]
impl<R: MemoryRecord + 'static> CatalogAdapter for InMemoryCatalog<R> {
    fn source(&self) -> Source {
        R::SOURCE
    }

    async fn query(
        &self,
        filter: &CatalogFilter,
        sort: CatalogSort,
        offset: u64,
        limit: u64,
    ) -> Result<CatalogPage, CatalogError> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);
        self.check_available()?;

        let mut matching: Vec<&R> = self
            .rows
            .iter()
            .filter(|row| Self::matches(row, filter))
            .map(|row| &row.record)
            .collect();
        matching.sort_by(|a, b| Self::compare(a, b, sort));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let items = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|record| (*record).clone().into())
            .collect();

        Ok(CatalogPage {
            items,
            total_matching: matching.len() as u64,
        })
    }

    async fn fetch(&self, numeric_id: u64) -> Result<Option<RawRecord>, CatalogError> {
        self.check_available()?;
        let wanted = i64::try_from(numeric_id).ok();
        Ok(self
            .rows
            .iter()
            .find(|row| wanted.is_some() && row.record.numeric_id() == wanted)
            .map(|row| row.record.clone().into()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::query::SortKey;

    fn global(id: i64, name: &str, price: i64, day: u32) -> GlobalRecord {
        GlobalRecord {
            id: Some(id),
            product_name: Some(name.to_string()),
            price: Some(price),
            sale_price: None,
            category1: None,
            category2: None,
            affiliate_link: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    fn ids(page: &CatalogPage) -> Vec<i64> {
        page.items
            .iter()
            .map(|record| match record {
                RawRecord::Global(r) => r.id.unwrap_or_default(),
                RawRecord::Seller(r) => r.id.unwrap_or_default(),
            })
            .collect()
    }

    fn catalog() -> InMemoryCatalog<GlobalRecord> {
        InMemoryCatalog::new(vec![
            global(1, "Blue Mug", 300, 1),
            global(2, "Red Mug", 100, 3),
            global(3, "Tea Pot", 200, 2),
        ])
        .with_disabled(global(4, "Hidden Mug", 50, 4))
    }

    #[tokio::test]
    async fn latest_orders_newest_first() {
        let page = catalog()
            .query(
                &CatalogFilter::listing(),
                SortKey::Latest.into(),
                0,
                10,
            )
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![2, 3, 1]);
        assert_eq!(page.total_matching, 3);
    }

    #[tokio::test]
    async fn price_sort_and_window() {
        let page = catalog()
            .query(&CatalogFilter::listing(), SortKey::PriceAsc.into(), 1, 1)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![3]);
        assert_eq!(page.total_matching, 3);
    }

    #[tokio::test]
    async fn text_filter_is_case_insensitive_and_respects_enabled_flag() {
        let page = catalog()
            .query(&CatalogFilter::search("mug"), SortKey::Latest.into(), 0, 10)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![2, 1]);

        let unfiltered = CatalogFilter {
            text: Some("MUG".to_string()),
            enabled_only: false,
        };
        let page = catalog()
            .query(&unfiltered, SortKey::Latest.into(), 0, 10)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![4, 2, 1]);
    }

    #[tokio::test]
    async fn zero_limit_only_counts() {
        let page = catalog()
            .query(&CatalogFilter::listing(), SortKey::Latest.into(), 0, 0)
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_matching, 3);
    }

    #[tokio::test]
    async fn failing_catalog_reports_its_source() {
        let catalog = catalog();
        catalog.fail_with("connection refused");
        let err = catalog
            .query(&CatalogFilter::listing(), SortKey::Latest.into(), 0, 10)
            .await
            .unwrap_err();
        assert_eq!(err.catalog(), Source::Global);
        assert_eq!(catalog.query_count(), 1);
    }

    #[tokio::test]
    async fn fetch_finds_disabled_records_too() {
        let record = catalog().fetch(4).await.unwrap();
        assert!(matches!(record, Some(RawRecord::Global(r)) if r.id == Some(4)));
        assert!(catalog().fetch(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn price_sort_ignores_sale_price_above_list() {
        let mut discounted = global(1, "Mug", 500, 1);
        discounted.sale_price = Some(50);
        let mut bogus = global(2, "Mug", 100, 1);
        bogus.sale_price = Some(900);
        let catalog = InMemoryCatalog::new(vec![discounted, bogus, global(3, "Mug", 70, 1)]);

        let page = catalog
            .query(&CatalogFilter::listing(), SortKey::PriceAsc.into(), 0, 10)
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![1, 3, 2]);
    }
}
