//! GLOBAL catalog adapter over the affiliate listings database.
//!
//! The affiliate store is operated separately and uses quoted camelCase
//! identifiers:
//!
//! ```text
//! "GlobalProduct"("id" BIGINT PK, "productName" TEXT, "price" BIGINT,
//!                 "salePrice" BIGINT NULL, "category1" TEXT NULL,
//!                 "category2" TEXT NULL, "affiliateLink" TEXT NULL,
//!                 "isActive" BOOLEAN, "createdAt" TIMESTAMPTZ)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use unicat_core::{GlobalRecord, RawRecord, Source};
use unicat_search::{CatalogAdapter, CatalogError, CatalogFilter, CatalogPage, CatalogSort};

use crate::sql::{like_pattern, order_by, to_bigint, SortColumns};

const SELECT_COLUMNS: &str = r#"g."id", g."productName", g."price", g."salePrice", g."category1", g."category2", g."affiliateLink", g."createdAt""#;

const FROM_CLAUSE: &str = r#"FROM "GlobalProduct" g"#;

const WHERE_CLAUSE: &str = r#"WHERE ($1::TEXT IS NULL OR g."productName" ILIKE $1) AND (NOT $2::BOOLEAN OR g."isActive")"#;

const SORT_COLUMNS: SortColumns = SortColumns {
    created_at: r#"g."createdAt""#,
    effective_price: r#"CASE WHEN g."salePrice" <= COALESCE(g."price", 0) THEN g."salePrice" ELSE COALESCE(g."price", 0) END"#,
    id: r#"g."id""#,
};

/// A row from `"GlobalProduct"`, named the way the affiliate store names it.
#[derive(Debug, Clone, sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct GlobalProductRow {
    pub id: i64,
    pub product_name: Option<String>,
    pub price: Option<i64>,
    pub sale_price: Option<i64>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub affiliate_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<GlobalProductRow> for GlobalRecord {
    fn from(row: GlobalProductRow) -> Self {
        GlobalRecord {
            id: Some(row.id),
            product_name: row.product_name,
            price: row.price,
            sale_price: row.sale_price,
            category1: row.category1,
            category2: row.category2,
            affiliate_link: row.affiliate_link,
            created_at: row.created_at,
        }
    }
}

/// Read-only adapter for the GLOBAL affiliate catalog.
#[derive(Debug, Clone)]
pub struct GlobalCatalog {
    pool: PgPool,
}

impl GlobalCatalog {
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
    tracing::debug!(source = %Source::Global, error = %error, "global catalog query error");
    CatalogError::unavailable(Source::Global, error.to_string())
}

#[async_trait]
impl CatalogAdapter for GlobalCatalog {
    fn source(&self) -> Source {
        Source::Global
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
            sqlx::query_as::<_, GlobalProductRow>(&rows_sql)
                .bind(pattern.as_deref())
                .bind(filter.enabled_only)
                .bind(to_bigint(limit))
                .bind(to_bigint(offset))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| unavailable(&e))?
                .into_iter()
                .map(|row| RawRecord::Global(row.into()))
                .collect()
        };

        Ok(CatalogPage {
            items,
            total_matching: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn fetch(&self, numeric_id: u64) -> Result<Option<RawRecord>, CatalogError> {
        let sql = format!(r#"SELECT {SELECT_COLUMNS} {FROM_CLAUSE} WHERE g."id" = $1"#);
        let row = sqlx::query_as::<_, GlobalProductRow>(&sql)
            .bind(to_bigint(numeric_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable(&e))?;
        Ok(row.map(|row| RawRecord::Global(row.into())))
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        crate::ping(&self.pool).await.map_err(|e| unavailable(&e))
    }
}
