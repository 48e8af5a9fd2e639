//! Catalog-backed commands. These load the full application config and
//! connect both catalog pools.

use std::sync::Arc;

use unicat_core::canonical_url;
use unicat_search::{Paginator, SearchPage, SortKey};

async fn connect() -> anyhow::Result<Paginator> {
    let config = unicat_core::load_app_config()?;
    let (seller, global) = unicat_db::connect_catalogs(&config).await?;
    Ok(Paginator::new(
        Arc::new(seller),
        Arc::new(global),
        config.page_size,
    ))
}

pub async fn run_search(query: &str, sort: SortKey, page: u32, json: bool) -> anyhow::Result<()> {
    let paginator = connect().await?;
    let result = paginator.search(query, sort, page).await?;
    print_page(&result, page, json)
}

pub async fn run_list(sort: SortKey, page: u32, json: bool) -> anyhow::Result<()> {
    let paginator = connect().await?;
    let result = paginator.list(sort, page).await?;
    print_page(&result, page, json)
}

fn print_page(result: &SearchPage, page: u32, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    for line in render_page(result, page) {
        println!("{line}");
    }
    Ok(())
}

/// Plain-text table: one row per product, then a summary line.
pub(crate) fn render_page(result: &SearchPage, page: u32) -> Vec<String> {
    let mut lines: Vec<String> = result
        .combined
        .iter()
        .map(|product| {
            format!(
                "{:<16} {:>10}  {}  {}",
                product.id().to_string(),
                product.effective_price(),
                product.product_name,
                canonical_url(product)
            )
        })
        .collect();

    let mut summary = format!(
        "page {}: {} seller + {} global of {} total{}",
        page.max(1),
        result.seller_count,
        result.global_count,
        result.total,
        if result.has_next_page { ", more available" } else { "" }
    );
    if result.partial {
        summary.push_str(" (global catalog unavailable)");
    }
    lines.push(summary);
    lines
}
