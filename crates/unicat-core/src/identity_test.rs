use chrono::{TimeZone, Utc};

use super::*;
use crate::products::SourceMeta;

fn make_product(source: Source, numeric_id: u64, name: &str) -> UnifiedProduct {
    let source_meta = match source {
        Source::Seller => SourceMeta::Seller {
            shop_name: None,
            store_url: None,
        },
        Source::Global => SourceMeta::Global {
            affiliate_link: None,
        },
    };
    UnifiedProduct {
        id: ProductId::new(source, numeric_id),
        product_name: name.to_string(),
        price: 10_000,
        sale_price: None,
        category1: None,
        category2: None,
        source_meta,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

// -----------------------------------------------------------------------
// encode / decode
// -----------------------------------------------------------------------

#[test]
fn encode_joins_source_and_id() {
    assert_eq!(encode(Source::Seller, 42), "SELLER_42");
    assert_eq!(encode(Source::Global, 7), "GLOBAL_7");
}

#[test]
fn decode_round_trips_encode() {
    for source in Source::ALL {
        for numeric_id in [0, 1, 9, 42, 1_000_000, u64::MAX] {
            let id = encode(source, numeric_id);
            assert_eq!(decode(&id), Ok((source, numeric_id)), "id {id}");
        }
    }
}

#[test]
fn decode_rejects_unknown_prefix() {
    assert_eq!(
        decode("VENDOR_42"),
        Err(IdentityError::InvalidIdFormat("VENDOR_42".to_string()))
    );
}

#[test]
fn decode_rejects_lowercase_prefix() {
    assert!(decode("seller_42").is_err());
}

#[test]
fn decode_rejects_missing_separator() {
    assert!(decode("SELLER42").is_err());
}

#[test]
fn decode_rejects_empty_remainder() {
    assert!(decode("GLOBAL_").is_err());
}

#[test]
fn decode_rejects_non_numeric_remainder() {
    for id in ["SELLER_abc", "SELLER_4x2", "SELLER_-1", "SELLER_+1", "SELLER_ 1"] {
        assert!(decode(id).is_err(), "expected {id} to be rejected");
    }
}

#[test]
fn decode_rejects_overflowing_id() {
    assert!(decode("SELLER_18446744073709551616").is_err());
}

#[test]
fn product_id_parses_and_displays() {
    let id: ProductId = "GLOBAL_9001".parse().expect("valid id");
    assert_eq!(id.source(), Source::Global);
    assert_eq!(id.numeric_id(), 9001);
    assert_eq!(id.to_string(), "GLOBAL_9001");
}

#[test]
fn product_id_serializes_as_string() {
    let json = serde_json::to_string(&ProductId::new(Source::Seller, 5)).expect("serialize");
    assert_eq!(json, "\"SELLER_5\"");
}

// -----------------------------------------------------------------------
// reconstruct_id
// -----------------------------------------------------------------------

#[test]
fn reconstruct_id_uppercases_tag() {
    assert_eq!(reconstruct_id("seller", 42).as_deref(), Ok("SELLER_42"));
    assert_eq!(reconstruct_id("Global", 7).as_deref(), Ok("GLOBAL_7"));
}

#[test]
fn reconstruct_id_rejects_unknown_tag() {
    assert_eq!(
        reconstruct_id("vendor", 1),
        Err(IdentityError::UnknownSource("vendor".to_string()))
    );
}

// -----------------------------------------------------------------------
// slugify
// -----------------------------------------------------------------------

#[test]
fn slugify_collapses_spaces_and_punctuation() {
    assert_eq!(slugify("Linen Shirt (Navy) / L"), "Linen-Shirt-Navy-L");
}

#[test]
fn slugify_trims_and_strips_edge_hyphens() {
    assert_eq!(slugify("  [Sale] Summer Hat!!  "), "Sale-Summer-Hat");
    assert_eq!(slugify("--already-hyphenated--"), "already-hyphenated");
}

#[test]
fn slugify_collapses_repeated_hyphens() {
    assert_eq!(slugify("a - - b"), "a-b");
    assert_eq!(slugify("a---b"), "a-b");
}

#[test]
fn slugify_keeps_case_and_non_latin_text() {
    assert_eq!(slugify("한옥 머그컵 Set"), "한옥-머그컵-Set");
}

#[test]
fn slugify_keeps_other_symbols() {
    assert_eq!(slugify("50% off: Tea & Co."), "50%-off:-Tea-&-Co");
}

#[test]
fn slugify_truncates_to_max_chars() {
    let name = "x".repeat(150);
    assert_eq!(slugify(&name).chars().count(), MAX_SLUG_CHARS);
}

#[test]
fn slugify_counts_characters_not_bytes() {
    let name = "가".repeat(120);
    let slug = slugify(&name);
    assert_eq!(slug.chars().count(), MAX_SLUG_CHARS);
}

#[test]
fn slugify_strips_hyphen_left_by_truncation() {
    // 99 chars, a separator, then more text: the cut lands right after the hyphen.
    let name = format!("{} tail", "a".repeat(99));
    let slug = slugify(&name);
    assert_eq!(slug, "a".repeat(99));
    assert!(!slug.ends_with('-'));
}

#[test]
fn slugify_punctuation_only_name_is_empty() {
    assert_eq!(slugify("?!? ..."), "");
}

#[test]
fn slugify_is_idempotent_and_well_formed() {
    let long = "long name segment ".repeat(12);
    let names = [
        "Plain",
        "  spaced   out  ",
        "((brackets)) [and] {braces}",
        "dots.and,commas!?",
        "mixed - / - separators",
        "한글 상품명 (특가)",
        long.as_str(),
        "-leading and trailing-",
    ];
    for name in names {
        let once = slugify(name);
        assert_eq!(slugify(&once), once, "not idempotent for {name:?}");
        assert!(!once.starts_with('-'), "leading hyphen for {name:?}");
        assert!(!once.ends_with('-'), "trailing hyphen for {name:?}");
        assert!(!once.contains("--"), "doubled hyphen for {name:?}");
        assert!(once.chars().count() <= MAX_SLUG_CHARS);
        assert!(!once.is_empty(), "empty slug for {name:?}");
    }
}

// -----------------------------------------------------------------------
// canonical paths
// -----------------------------------------------------------------------

#[test]
fn canonical_url_uses_source_id_and_slug() {
    let product = make_product(Source::Seller, 42, "Linen Shirt (Navy)");
    assert_eq!(canonical_url(&product), "/products/SELLER/42/Linen-Shirt-Navy");
}

#[test]
fn canonical_url_falls_back_to_placeholder_slug() {
    let product = make_product(Source::Global, 7, "!!!");
    assert_eq!(canonical_url(&product), "/products/GLOBAL/7/product");
}

#[test]
fn parse_canonical_path_splits_segments() {
    let (id, slug) = parse_canonical_path("/products/GLOBAL/7/Travel-Mug").expect("valid path");
    assert_eq!(id, ProductId::new(Source::Global, 7));
    assert_eq!(slug, "Travel-Mug");
}

#[test]
fn parse_canonical_path_rejects_legacy_shape() {
    assert!(parse_canonical_path("/products/SELLER_42").is_err());
}

#[test]
fn parse_canonical_path_rejects_unknown_source() {
    assert!(matches!(
        parse_canonical_path("/products/VENDOR/1/x"),
        Err(IdentityError::UnknownSource(_))
    ));
}
