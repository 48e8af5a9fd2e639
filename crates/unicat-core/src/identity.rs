//! Product identity and addressing.
//!
//! Every product is addressed as `{SOURCE}_{numericId}` (e.g. `SELLER_42`).
//! The source prefix keeps numeric ids from the two catalogs from colliding.
//! Canonical URLs add a cosmetic slug derived from the product name:
//!
//! ```text
//! /products/SELLER/42/Linen-Shirt-Navy
//! ```
//!
//! The slug is never part of identity; lookups use only the source and id
//! segments.

use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::products::{Source, UnifiedProduct};

/// Separator between the source tag and the numeric id.
pub const ID_SEPARATOR: char = '_';

/// Slug used when the real slug is unknown or empty.
pub const PLACEHOLDER_SLUG: &str = "product";

/// Maximum slug length in characters.
pub const MAX_SLUG_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("invalid product id format: \"{0}\"")]
    InvalidIdFormat(String),
    #[error("unknown catalog source: \"{0}\"")]
    UnknownSource(String),
}

/// Decoded product identity: which catalog, and the id inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId {
    pub(crate) source: Source,
    pub(crate) numeric_id: u64,
}

impl ProductId {
    #[must_use]
    pub fn new(source: Source, numeric_id: u64) -> Self {
        Self { source, numeric_id }
    }

    #[must_use]
    pub fn source(self) -> Source {
        self.source
    }

    #[must_use]
    pub fn numeric_id(self) -> u64 {
        self.numeric_id
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{ID_SEPARATOR}{}", self.source, self.numeric_id)
    }
}

impl FromStr for ProductId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, numeric_id) = decode(s)?;
        Ok(Self { source, numeric_id })
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Builds the global id string for a product, e.g. `"GLOBAL_7"`.
#[must_use]
pub fn encode(source: Source, numeric_id: u64) -> String {
    ProductId::new(source, numeric_id).to_string()
}

/// Splits a global id back into its source and numeric id.
///
/// # Errors
///
/// Returns [`IdentityError::InvalidIdFormat`] when no known source prefix
/// matches or the remainder is not a plain decimal number.
pub fn decode(id: &str) -> Result<(Source, u64), IdentityError> {
    let invalid = || IdentityError::InvalidIdFormat(id.to_string());

    let (source, rest) = Source::ALL
        .iter()
        .find_map(|source| {
            id.strip_prefix(source.as_str())
                .and_then(|rest| rest.strip_prefix(ID_SEPARATOR))
                .map(|rest| (*source, rest))
        })
        .ok_or_else(invalid)?;

    Ok((source, parse_numeric_id(rest).ok_or_else(invalid)?))
}

/// Rebuilds an id from a source tag and numeric id taken from URL path
/// segments. The tag is matched case-insensitively.
///
/// # Errors
///
/// Returns [`IdentityError::UnknownSource`] when the tag names neither catalog.
pub fn reconstruct_id(source_tag: &str, numeric_id: u64) -> Result<String, IdentityError> {
    Ok(encode(parse_source_tag(source_tag)?, numeric_id))
}

/// Parses a catalog tag such as `"seller"` or `"GLOBAL"`.
///
/// # Errors
///
/// Returns [`IdentityError::UnknownSource`] when the tag names neither catalog.
pub fn parse_source_tag(source_tag: &str) -> Result<Source, IdentityError> {
    let upper = source_tag.to_ascii_uppercase();
    Source::ALL
        .into_iter()
        .find(|source| source.as_str() == upper)
        .ok_or_else(|| IdentityError::UnknownSource(source_tag.to_string()))
}

/// Derives an SEO slug from a product name.
///
/// Runs of whitespace, brackets and the punctuation `/ . , ! ?` collapse into
/// a single hyphen, as do repeated hyphens. Leading and trailing hyphens are
/// stripped and the result is cut to [`MAX_SLUG_CHARS`] characters. Letter
/// case and every other character are kept as-is.
///
/// Names made only of separator characters produce an empty slug.
#[must_use]
pub fn slugify(product_name: &str) -> String {
    let mut slug = String::with_capacity(product_name.len());
    let mut pending_hyphen = false;

    for ch in product_name.trim().chars() {
        if is_slug_separator(ch) {
            pending_hyphen = true;
            continue;
        }
        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        slug.push(ch);
    }

    match slug.char_indices().nth(MAX_SLUG_CHARS) {
        Some((cut, _)) => slug[..cut].trim_end_matches('-').to_string(),
        None => slug,
    }
}

/// Canonical, cacheable path for a product:
/// `/products/{SOURCE}/{numericId}/{slug}`.
#[must_use]
pub fn canonical_url(product: &UnifiedProduct) -> String {
    canonical_path(product.id(), &slugify(&product.product_name))
}

/// Builds a canonical path from an id and an already-computed slug, falling
/// back to [`PLACEHOLDER_SLUG`] when the slug is empty.
#[must_use]
pub fn canonical_path(id: ProductId, slug: &str) -> String {
    let slug = if slug.is_empty() { PLACEHOLDER_SLUG } else { slug };
    format!("/products/{}/{}/{slug}", id.source, id.numeric_id)
}

/// Splits a canonical path into the product id and the slug it carried.
///
/// # Errors
///
/// Returns [`IdentityError::InvalidIdFormat`] when the path does not have the
/// `/products/{source}/{id}/{slug}` shape or the id segment is not numeric,
/// and [`IdentityError::UnknownSource`] for an unrecognised source segment.
pub fn parse_canonical_path(path: &str) -> Result<(ProductId, String), IdentityError> {
    let invalid = || IdentityError::InvalidIdFormat(path.to_string());

    let rest = path.strip_prefix("/products/").ok_or_else(invalid)?;
    let mut segments = rest.splitn(3, '/');
    let (Some(source_tag), Some(id_segment), Some(slug)) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(invalid());
    };

    let source = parse_source_tag(source_tag)?;
    let numeric_id = parse_numeric_id(id_segment).ok_or_else(invalid)?;
    Ok((ProductId::new(source, numeric_id), slug.to_string()))
}

fn parse_numeric_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>().ok()
}

fn is_slug_separator(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '(' | ')' | '[' | ']' | '{' | '}' | '/' | '.' | ',' | '!' | '?' | '-'
        )
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
