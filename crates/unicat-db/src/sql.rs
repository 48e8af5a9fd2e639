//! SQL fragments shared by the two catalog adapters.

use unicat_search::{CatalogSort, SortDirection, SortField};

/// Column expressions one catalog table uses for sorting.
pub(crate) struct SortColumns {
    pub created_at: &'static str,
    pub effective_price: &'static str,
    pub id: &'static str,
}

/// Builds an `ORDER BY` clause from trusted column expressions. Ties always
/// fall back to the id, newest first, so offsets are stable.
pub(crate) fn order_by(sort: CatalogSort, columns: &SortColumns) -> String {
    let column = match sort.field {
        SortField::CreatedAt => columns.created_at,
        SortField::EffectivePrice => columns.effective_price,
    };
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!("ORDER BY {column} {direction}, {} DESC", columns.id)
}

/// Turns free text into an `ILIKE` substring pattern, escaping the LIKE
/// wildcards so they match literally.
pub(crate) fn like_pattern(text: Option<&str>) -> Option<String> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    Some(pattern)
}

/// Clamps an unsigned offset or limit into Postgres `BIGINT` range.
pub(crate) fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use unicat_search::SortKey;

    use super::*;

    const COLUMNS: SortColumns = SortColumns {
        created_at: "p.created_at",
        effective_price: "COALESCE(p.sale_price, p.price)",
        id: "p.id",
    };

    #[test]
    fn order_by_latest() {
        assert_eq!(
            order_by(SortKey::Latest.into(), &COLUMNS),
            "ORDER BY p.created_at DESC, p.id DESC"
        );
    }

    #[test]
    fn order_by_price_ascending_uses_effective_price() {
        assert_eq!(
            order_by(SortKey::PriceAsc.into(), &COLUMNS),
            "ORDER BY COALESCE(p.sale_price, p.price) ASC, p.id DESC"
        );
    }

    #[test]
    fn order_by_price_descending() {
        assert_eq!(
            order_by(SortKey::PriceDesc.into(), &COLUMNS),
            "ORDER BY COALESCE(p.sale_price, p.price) DESC, p.id DESC"
        );
    }

    #[test]
    fn like_pattern_wraps_text() {
        assert_eq!(like_pattern(Some("mug")).as_deref(), Some("%mug%"));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(
            like_pattern(Some("50%_off\\")).as_deref(),
            Some("%50\\%\\_off\\\\%")
        );
    }

    #[test]
    fn like_pattern_blank_text_is_no_filter() {
        assert!(like_pattern(Some("  ")).is_none());
        assert!(like_pattern(None).is_none());
    }

    #[test]
    fn to_bigint_saturates() {
        assert_eq!(to_bigint(40), 40);
        assert_eq!(to_bigint(u64::MAX), i64::MAX);
    }
}
