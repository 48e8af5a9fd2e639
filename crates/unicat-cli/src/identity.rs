//! Offline identity commands: slugs, legacy path resolution and id decoding.
//! None of these touch a catalog.

use unicat_core::{
    decode, parse_canonical_path, resolve_legacy_path, slugify, IdentityError, LegacyResolution,
    PLACEHOLDER_SLUG,
};

pub fn slug_line(name: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        tracing::warn!(name, "name has no sluggable characters");
        return format!("(empty; canonical URLs use \"{PLACEHOLDER_SLUG}\")");
    }
    slug
}

/// Describes what the server does with `path`: a legacy redirect, a product
/// page lookup, or nothing product-related.
pub fn resolve_lines(path: &str) -> Vec<String> {
    match resolve_legacy_path(path) {
        LegacyResolution::LegacyPathMatched { location } => {
            vec![format!("301 Moved Permanently -> {location}")]
        }
        LegacyResolution::Passthrough => match parse_canonical_path(path) {
            Ok((id, slug)) => vec![
                "passthrough: product page".to_string(),
                format!("id: {id}"),
                format!("slug: {slug}"),
            ],
            Err(_) => vec!["passthrough: not a product path".to_string()],
        },
    }
}

pub fn decode_line(id: &str) -> Result<String, IdentityError> {
    let (source, numeric_id) = decode(id)?;
    Ok(format!("source: {source}\nnumeric_id: {numeric_id}"))
}
