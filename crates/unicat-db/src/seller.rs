//! SELLER catalog adapter over the storefront mirror database.
//!
//! Reads the tables maintained by the storefront sync job:
//!
//! ```text
//! seller_products(id BIGINT PK, shop_id BIGINT, product_name TEXT,
//!                 price BIGINT, sale_price BIGINT NULL,
//!                 category1 TEXT NULL, category2 TEXT NULL,
//!                 is_enabled BOOLEAN, created_at TIMESTAMPTZ)
//! shops(id BIGINT PK, shop_name TEXT, store_url TEXT)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use unicat_core::{RawRecord, SellerRecord, Source};
use unicat_search::{CatalogAdapter, CatalogError, CatalogFilter, CatalogPage, CatalogSort};

use crate::sql::{like_pattern, order_by, to_bigint, SortColumns};

const SELECT_COLUMNS: &str = "p.id, p.product_name, p.price, p.sale_price, \
     p.category1, p.category2, s.shop_name, s.store_url, p.created_at";

const FROM_CLAUSE: &str = "FROM seller_products p LEFT JOIN shops s ON s.id = p.shop_id";

const WHERE_CLAUSE: &str = "WHERE ($1::TEXT IS NULL OR p.product_name ILIKE $1) \
       AND (NOT $2::BOOLEAN OR p.is_enabled)";

const SORT_COLUMNS: SortColumns = SortColumns {
    created_at: "p.created_at",
    effective_price: "CASE WHEN p.sale_price <= COALESCE(p.price, 0) \
         THEN p.sale_price ELSE COALESCE(p.price, 0) END",
    id: "p.id",
};

/// A row from `seller_products` joined with its shop.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SellerProductRow {
    pub id: i64,
    pub product_name: Option<String>,
    pub price: Option<i64>,
    pub sale_price: Option<i64>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    /// `NULL` when the product's shop row is gone.
    pub shop_name: Option<String>,
    pub store_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SellerProductRow> for SellerRecord {
    fn from(row: SellerProductRow) -> Self {
        SellerRecord {
            id: Some(row.id),
            product_name: row.product_name,
            price: row.price,
            sale_price: row.sale_price,
            category1: row.category1,
            category2: row.category2,
            shop_name: row.shop_name,
            store_url: row.store_url,
            created_at: row.created_at,
        }
    }
}

/// Read-only adapter for the SELLER catalog.
#[derive(Debug, Clone)]
pub struct SellerCatalog {
    pool: PgPool,
}

impl SellerCatalog {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn unavailable(error: &sqlx::Error) -> CatalogError {
    tracing::debug!(source = %Source::Seller, error = %error, "seller catalog query error");
    CatalogError::unavailable(Source::Seller, error.to_string())
}

#[async_trait]
impl CatalogAdapter for SellerCatalog {
    fn source(&self) -> Source {
        Source::Seller
    }

    async fn query(
        &self,
        filter: &CatalogFilter,
        sort: CatalogSort,
        offset: u64,
        limit: u64,
    ) -> Result<CatalogPage, CatalogError> {
        let pattern = like_pattern(filter.text.as_deref());

        let count_sql = format!("SELECT COUNT(*) {FROM_CLAUSE} {WHERE_CLAUSE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(pattern.as_deref())
            .bind(filter.enabled_only)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unavailable(&e))?;

        let items = if limit == 0 {
            Vec::new()
        } else {
            let rows_sql = format!(
                "SELECT {SELECT_COLUMNS} {FROM_CLAUSE} {WHERE_CLAUSE} {} LIMIT $3 OFFSET $4",
                order_by(sort, &SORT_COLUMNS)
            );
            sqlx::query_as::<_, SellerProductRow>(&rows_sql)
                .bind(pattern.as_deref())
                .bind(filter.enabled_only)
                .bind(to_bigint(limit))
                .bind(to_bigint(offset))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| unavailable(&e))?
                .into_iter()
                .map(|row| RawRecord::Seller(row.into()))
                .collect()
        };

        Ok(CatalogPage {
            items,
            total_matching: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn fetch(&self, numeric_id: u64) -> Result<Option<RawRecord>, CatalogError> {
        let sql = format!("SELECT {SELECT_COLUMNS} {FROM_CLAUSE} WHERE p.id = $1");
        let row = sqlx::query_as::<_, SellerProductRow>(&sql)
            .bind(to_bigint(numeric_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable(&e))?;
        Ok(row.map(|row| RawRecord::Seller(row.into())))
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        crate::ping(&self.pool).await.map_err(|e| unavailable(&e))
    }
}
