use std::{str::FromStr, time::Duration};

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use thiserror::Error;

pub mod global;
pub mod seller;
mod sql;

pub use global::{GlobalCatalog, GlobalProductRow};
pub use seller::{SellerCatalog, SellerProductRow};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Postgres `statement_timeout` set on every pooled connection.
    pub statement_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            statement_timeout_secs: DEFAULT_STATEMENT_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &unicat_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
            statement_timeout_secs: config.query_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the URL cannot be parsed or the connection
/// cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?.options([(
        "statement_timeout",
        format!("{}s", config.statement_timeout_secs),
    )]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Connect both catalog pools described by `config` and wrap them in their
/// adapters.
///
/// # Errors
///
/// Returns [`DbError`] if either pool cannot be established.
pub async fn connect_catalogs(
    config: &unicat_core::AppConfig,
) -> Result<(SellerCatalog, GlobalCatalog), DbError> {
    let pool_config = PoolConfig::from_app_config(config);
    let seller_pool = connect_pool(&config.seller_database_url, pool_config).await?;
    let global_pool = connect_pool(&config.global_database_url, pool_config).await?;
    tracing::info!(
        max_connections = pool_config.max_connections,
        statement_timeout_secs = pool_config.statement_timeout_secs,
        "catalog pools connected"
    );
    Ok((SellerCatalog::new(seller_pool), GlobalCatalog::new(global_pool)))
}
