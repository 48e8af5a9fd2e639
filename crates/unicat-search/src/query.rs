//! Filter and sort inputs shared by both catalog adapters.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Row filter applied natively by each catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Case-insensitive substring match on the product name.
    pub text: Option<String>,
    /// Restrict to listings that are enabled for display.
    pub enabled_only: bool,
}

impl CatalogFilter {
    /// Filter for a text search over enabled listings.
    #[must_use]
    pub fn search(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            enabled_only: true,
        }
    }

    /// Filter for the plain listing: every enabled product.
    #[must_use]
    pub fn listing() -> Self {
        Self {
            text: None,
            enabled_only: true,
        }
    }
}

/// User-facing sort choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first by each catalog's own creation timestamp.
    #[default]
    Latest,
    /// Cheapest first by effective price (sale price, else list price).
    PriceAsc,
    /// Most expensive first by effective price.
    PriceDesc,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key \"{0}\"; expected latest, price_low or price_high")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    /// Accepts the HTTP names (`price_low`, `price_high`) and the camelCase
    /// aliases (`priceAsc`, `priceDesc`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortKey::Latest),
            "price_low" | "priceAsc" => Ok(SortKey::PriceAsc),
            "price_high" | "priceDesc" => Ok(SortKey::PriceDesc),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SortKey::Latest => "latest",
            SortKey::PriceAsc => "price_low",
            SortKey::PriceDesc => "price_high",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    EffectivePrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort as handed to an adapter. Adapters break ties by numeric id,
/// descending, so offsets stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl From<SortKey> for CatalogSort {
    fn from(key: SortKey) -> Self {
        let (field, direction) = match key {
            SortKey::Latest => (SortField::CreatedAt, SortDirection::Desc),
            SortKey::PriceAsc => (SortField::EffectivePrice, SortDirection::Asc),
            SortKey::PriceDesc => (SortField::EffectivePrice, SortDirection::Desc),
        };
        Self { field, direction }
    }
}
