pub mod app_config;
pub mod config;
pub mod identity;
pub mod legacy;
pub mod normalize;
pub mod products;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use identity::{
    canonical_path, canonical_url, decode, encode, parse_canonical_path, parse_source_tag,
    reconstruct_id, slugify, IdentityError, ProductId, PLACEHOLDER_SLUG,
};
pub use legacy::{resolve_legacy_path, LegacyResolution};
pub use normalize::{normalize, NormalizeError};
pub use products::{GlobalRecord, RawRecord, SellerRecord, Source, SourceMeta, UnifiedProduct};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
