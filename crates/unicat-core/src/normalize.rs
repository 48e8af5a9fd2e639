//! Normalization from native catalog records to [`UnifiedProduct`].
//!
//! This is the only module that knows either catalog's field names. The
//! SELLER store uses snake_case columns (`product_name`, `shop_name`), the
//! GLOBAL affiliate store uses camelCase (`productName`, `affiliateLink`);
//! both arrive here as typed [`RawRecord`] variants.

use thiserror::Error;

use crate::identity::ProductId;
use crate::products::{GlobalRecord, RawRecord, SellerRecord, Source, SourceMeta, UnifiedProduct};

/// A record that cannot be projected into a [`UnifiedProduct`].
///
/// Callers log and skip the record; it never fails a whole page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{catalog} record has no numeric id")]
    MissingId { catalog: Source },
    #[error("{catalog} record has non-positive id {id}")]
    InvalidId { catalog: Source, id: i64 },
    #[error("{catalog} record {id} has no product name")]
    MissingName { catalog: Source, id: i64 },
}

/// Fields shared by both record shapes after renaming.
struct CommonFields {
    id: Option<i64>,
    product_name: Option<String>,
    price: Option<i64>,
    sale_price: Option<i64>,
    category1: Option<String>,
    category2: Option<String>,
}

/// Projects a raw catalog record into the unified product shape.
///
/// # Errors
///
/// Returns [`NormalizeError`] when the record has no usable numeric id or
/// no non-blank product name.
pub fn normalize(record: RawRecord) -> Result<UnifiedProduct, NormalizeError> {
    let (catalog, common, source_meta, created_at) = match record {
        RawRecord::Seller(SellerRecord {
            id,
            product_name,
            price,
            sale_price,
            category1,
            category2,
            shop_name,
            store_url,
            created_at,
        }) => (
            Source::Seller,
            CommonFields {
                id,
                product_name,
                price,
                sale_price,
                category1,
                category2,
            },
            SourceMeta::Seller {
                shop_name: non_blank(shop_name),
                store_url: non_blank(store_url),
            },
            created_at,
        ),
        RawRecord::Global(GlobalRecord {
            id,
            product_name,
            price,
            sale_price,
            category1,
            category2,
            affiliate_link,
            created_at,
        }) => (
            Source::Global,
            CommonFields {
                id,
                product_name,
                price,
                sale_price,
                category1,
                category2,
            },
            SourceMeta::Global {
                affiliate_link: non_blank(affiliate_link),
            },
            created_at,
        ),
    };

    let raw_id = common.id.ok_or(NormalizeError::MissingId { catalog })?;
    let numeric_id = u64::try_from(raw_id)
        .ok()
        .filter(|id| *id > 0)
        .ok_or(NormalizeError::InvalidId {
            catalog,
            id: raw_id,
        })?;

    let product_name = non_blank(common.product_name).ok_or(NormalizeError::MissingName {
        catalog,
        id: raw_id,
    })?;

    let price = common.price.unwrap_or(0);
    // A sale price above the list price is a data-entry error; drop it.
    let sale_price = common.sale_price.filter(|sale| *sale <= price);

    Ok(UnifiedProduct {
        id: ProductId::new(catalog, numeric_id),
        product_name,
        price,
        sale_price,
        category1: non_blank(common.category1),
        category2: non_blank(common.category2),
        source_meta,
        created_at,
    })
}

/// Trims a string and treats an empty result as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
