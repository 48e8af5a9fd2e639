//! Redirects for pre-migration product URLs.
//!
//! Before slugged URLs existed, products lived at `/products/SELLER_42`.
//! Those paths are answered with a permanent redirect to a canonical path
//! carrying the placeholder slug (`/products/SELLER/42/product`). The
//! resolver never loads the product, so it cannot know the real slug; the
//! product page issues a second redirect once it has the record.

use std::sync::LazyLock;

use regex::Regex;

use crate::identity::{canonical_path, parse_source_tag, ProductId, PLACEHOLDER_SLUG};

static LEGACY_PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/products/(SELLER|GLOBAL)_(\d+)$").expect("valid legacy product path regex")
});

/// Outcome of matching a request path against the legacy URL shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyResolution {
    /// The path is a bare-id legacy URL; answer with a 301 to `location`.
    LegacyPathMatched { location: String },
    /// Not a legacy URL; serve the request unchanged.
    Passthrough,
}

/// Classifies a request path. Only exact `/products/{SOURCE}_{digits}` paths
/// match; anything with a trailing slug or extra segment passes through.
#[must_use]
pub fn resolve_legacy_path(path: &str) -> LegacyResolution {
    let Some(caps) = LEGACY_PRODUCT_PATH.captures(path) else {
        return LegacyResolution::Passthrough;
    };

    let (Ok(source), Ok(numeric_id)) = (parse_source_tag(&caps[1]), caps[2].parse::<u64>()) else {
        // Digit runs too long for u64 cannot name a product.
        return LegacyResolution::Passthrough;
    };

    LegacyResolution::LegacyPathMatched {
        location: canonical_path(ProductId::new(source, numeric_id), PLACEHOLDER_SLUG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(path: &str) -> Option<String> {
        match resolve_legacy_path(path) {
            LegacyResolution::LegacyPathMatched { location } => Some(location),
            LegacyResolution::Passthrough => None,
        }
    }

    #[test]
    fn seller_legacy_path_redirects_to_placeholder() {
        assert_eq!(
            location("/products/SELLER_42").as_deref(),
            Some("/products/SELLER/42/product")
        );
    }

    #[test]
    fn global_legacy_path_redirects_to_placeholder() {
        assert_eq!(
            location("/products/GLOBAL_7").as_deref(),
            Some("/products/GLOBAL/7/product")
        );
    }

    #[test]
    fn canonical_path_passes_through() {
        assert_eq!(
            resolve_legacy_path("/products/SELLER/42/actual-slug"),
            LegacyResolution::Passthrough
        );
    }

    #[test]
    fn legacy_path_with_trailing_segment_passes_through() {
        assert_eq!(
            resolve_legacy_path("/products/SELLER_42/slug"),
            LegacyResolution::Passthrough
        );
        assert_eq!(
            resolve_legacy_path("/products/SELLER_42/"),
            LegacyResolution::Passthrough
        );
    }

    #[test]
    fn unknown_or_lowercase_prefix_passes_through() {
        assert_eq!(
            resolve_legacy_path("/products/VENDOR_42"),
            LegacyResolution::Passthrough
        );
        assert_eq!(
            resolve_legacy_path("/products/seller_42"),
            LegacyResolution::Passthrough
        );
    }

    #[test]
    fn non_numeric_id_passes_through() {
        assert_eq!(
            resolve_legacy_path("/products/SELLER_4a"),
            LegacyResolution::Passthrough
        );
    }

    #[test]
    fn overflowing_id_passes_through() {
        assert_eq!(
            resolve_legacy_path("/products/GLOBAL_99999999999999999999999"),
            LegacyResolution::Passthrough
        );
    }

    #[test]
    fn unrelated_paths_pass_through() {
        for path in ["/search", "/products", "/", "/api/v1/health"] {
            assert_eq!(resolve_legacy_path(path), LegacyResolution::Passthrough);
        }
    }
}
