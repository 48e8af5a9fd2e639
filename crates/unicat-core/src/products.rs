use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::ProductId;

/// The two catalogs a product can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    /// First-party catalog mirrored from onboarded storefronts.
    Seller,
    /// Externally sourced affiliate catalog.
    Global,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Seller, Source::Global];

    /// Wire tag used in ids and URL path segments, e.g. `"SELLER"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Seller => "SELLER",
            Source::Global => "GLOBAL",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific fields the presentation layer needs. One variant per
/// catalog; the two shapes never mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum SourceMeta {
    Seller {
        shop_name: Option<String>,
        store_url: Option<String>,
    },
    Global {
        affiliate_link: Option<String>,
    },
}

impl SourceMeta {
    #[must_use]
    pub fn source(&self) -> Source {
        match self {
            SourceMeta::Seller { .. } => Source::Seller,
            SourceMeta::Global { .. } => Source::Global,
        }
    }
}

/// One product in the unified shape shared by both catalogs.
///
/// Built fresh from a raw catalog record on every query and dropped once the
/// response is written. Use [`crate::normalize`] to construct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedProduct {
    pub(crate) id: ProductId,
    pub product_name: String,
    /// List price in integer currency units.
    pub price: i64,
    /// Sale price, never above `price`.
    pub sale_price: Option<i64>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub source_meta: SourceMeta,
    pub created_at: DateTime<Utc>,
}

impl UnifiedProduct {
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    #[must_use]
    pub fn source(&self) -> Source {
        self.id.source
    }

    /// Price used for price sorting: the sale price when set, otherwise the
    /// list price.
    #[must_use]
    pub fn effective_price(&self) -> i64 {
        self.sale_price.unwrap_or(self.price)
    }
}

/// A record as returned by one of the catalog adapters, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecord {
    Seller(SellerRecord),
    Global(GlobalRecord),
}

impl RawRecord {
    #[must_use]
    pub fn source(&self) -> Source {
        match self {
            RawRecord::Seller(_) => Source::Seller,
            RawRecord::Global(_) => Source::Global,
        }
    }
}

impl From<SellerRecord> for RawRecord {
    fn from(record: SellerRecord) -> Self {
        RawRecord::Seller(record)
    }
}

impl From<GlobalRecord> for RawRecord {
    fn from(record: GlobalRecord) -> Self {
        RawRecord::Global(record)
    }
}

/// Native SELLER catalog row. Field names follow the seller store's
/// snake_case columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerRecord {
    pub id: Option<i64>,
    pub product_name: Option<String>,
    pub price: Option<i64>,
    pub sale_price: Option<i64>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub shop_name: Option<String>,
    pub store_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Native GLOBAL catalog row. The affiliate store uses camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalRecord {
    pub id: Option<i64>,
    pub product_name: Option<String>,
    pub price: Option<i64>,
    pub sale_price: Option<i64>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub affiliate_link: Option<String>,
    pub created_at: DateTime<Utc>,
}
