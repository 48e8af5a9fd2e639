use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Largest page size the engine will serve; bounds the per-page scan budget.
pub const MAX_PAGE_SIZE: usize = 200;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let seller_database_url = require("SELLER_DATABASE_URL")?;
    let global_database_url = require("GLOBAL_DATABASE_URL")?;

    let env = parse_environment(&or_default("UNICAT_ENV", "development"))?;

    let bind_addr = or_default("UNICAT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("UNICAT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("UNICAT_LOG_LEVEL", "info");

    let page_size = or_default("UNICAT_PAGE_SIZE", "20")
        .parse::<usize>()
        .map_err(|e| invalid("UNICAT_PAGE_SIZE", e.to_string()))?;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(invalid(
            "UNICAT_PAGE_SIZE",
            format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
        ));
    }

    let db_max_connections = parse_u32("UNICAT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("UNICAT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("UNICAT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let query_timeout_secs = parse_u64("UNICAT_QUERY_TIMEOUT_SECS", "5")?;

    Ok(AppConfig {
        seller_database_url,
        global_database_url,
        env,
        bind_addr,
        log_level,
        page_size,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        query_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "UNICAT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
