//! Closed-form page offsets for seller-priority fill.
//!
//! No cursor is stored between requests. Given the page number, page size
//! and the seller catalog's current match count, the number of seller and
//! global items served by all earlier pages is fully determined:
//!
//! ```text
//! seller_before = min(seller_total, (page - 1) * page_size)
//! global_before = (page - 1) * page_size - seller_before
//! ```
//!
//! `global_before` is where this page's global fill starts, which keeps the
//! global items served across consecutive pages contiguous.

/// Where each catalog's slice starts for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillWindow {
    /// Offset of the seller slice: every earlier page was seller-first.
    pub seller_offset: u64,
    /// Number of global items already served by pages `1..page`.
    pub global_offset: u64,
}

/// Computes both catalog offsets for `page` (1-based; 0 is treated as 1).
#[must_use]
pub fn fill_window(page: u32, page_size: usize, seller_total: u64) -> FillWindow {
    let before = u64::from(page.max(1) - 1) * page_size as u64;
    let seller_before = seller_total.min(before);
    FillWindow {
        seller_offset: before,
        global_offset: before - seller_before,
    }
}

/// Whether any matching item lies beyond `page`.
#[must_use]
pub fn has_next_page(page: u32, page_size: usize, total: u64) -> bool {
    u64::from(page.max(1)) * (page_size as u64) < total
}
