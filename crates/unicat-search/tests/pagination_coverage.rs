//! Walks every page of a search and checks the merged stream against each
//! catalog's own ordering. No external services needed.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use unicat_core::{normalize, GlobalRecord, SellerRecord, Source};
use unicat_search::{
    CatalogAdapter, CatalogFilter, CatalogSort, InMemoryCatalog, Paginator, SortKey,
};

fn seller_record(id: i64) -> SellerRecord {
    SellerRecord {
        id: Some(id),
        product_name: Some(format!("Ceramic Mug {id}")),
        // Repeating prices force the id tie-break to matter.
        price: Some(1_000 * (id % 4 + 1)),
        sale_price: (id % 3 == 0).then_some(500),
        category1: None,
        category2: None,
        shop_name: None,
        store_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap() + Duration::hours(id % 5),
    }
}

fn global_record(id: i64) -> GlobalRecord {
    GlobalRecord {
        id: Some(id),
        product_name: Some(format!("mug #{id}")),
        price: Some(700 * (id % 6 + 1)),
        sale_price: None,
        category1: None,
        category2: None,
        affiliate_link: None,
        created_at: Utc.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap() + Duration::hours(id % 7),
    }
}

/// Full ordered id list of one catalog for the search filter.
async fn catalog_order(adapter: &dyn CatalogAdapter, sort: SortKey) -> Vec<String> {
    let page = adapter
        .query(
            &CatalogFilter::search("mug"),
            CatalogSort::from(sort),
            0,
            u64::MAX,
        )
        .await
        .expect("in-memory catalog query");
    page.items
        .into_iter()
        .map(|record| normalize(record).expect("valid record").id().to_string())
        .collect()
}

async fn check_coverage(seller_total: i64, global_total: i64, page_size: usize, sort: SortKey) {
    let seller = Arc::new(InMemoryCatalog::new(
        (1..=seller_total).map(seller_record).collect(),
    ));
    let global = Arc::new(InMemoryCatalog::new(
        (1..=global_total).map(global_record).collect(),
    ));
    let seller_order = catalog_order(&*seller, sort).await;
    let global_order = catalog_order(&*global, sort).await;
    let paginator = Paginator::new(seller, global, page_size);

    let total = u64::try_from(seller_total + global_total).unwrap();
    let mut served_seller = Vec::new();
    let mut served_global = Vec::new();
    let mut fill_sum = 0;

    for page_number in 1..=200_u32 {
        let page = paginator
            .search("mug", sort, page_number)
            .await
            .expect("search succeeds");
        let context = format!(
            "seller={seller_total} global={global_total} size={page_size} sort={sort} page={page_number}"
        );

        assert_eq!(page.total, total, "{context}");
        assert!(page.combined.len() <= page_size, "{context}");
        assert_eq!(page.seller_count + page.global_count, page.combined.len(), "{context}");
        assert_eq!(
            page.has_next_page,
            u64::from(page_number) * (page_size as u64) < page.total,
            "{context}"
        );

        let seller_start = u64::from(page_number - 1) * page_size as u64;
        if u64::try_from(seller_total).unwrap() >= seller_start + page_size as u64 {
            assert_eq!(page.global_count, 0, "seller priority violated: {context}");
        }

        let (seller_block, global_block) = page.combined.split_at(page.seller_count);
        assert!(seller_block.iter().all(|p| p.source() == Source::Seller), "{context}");
        assert!(global_block.iter().all(|p| p.source() == Source::Global), "{context}");

        fill_sum += page_size - page.seller_count;
        served_seller.extend(seller_block.iter().map(|p| p.id().to_string()));
        served_global.extend(global_block.iter().map(|p| p.id().to_string()));

        if !page.has_next_page {
            break;
        }
    }

    assert_eq!(served_seller, seller_order);
    let expected_global: Vec<String> = global_order.into_iter().take(fill_sum).collect();
    assert_eq!(
        served_global, expected_global,
        "global fill must be contiguous: seller={seller_total} global={global_total} size={page_size} sort={sort}"
    );
}

#[tokio::test]
async fn global_fill_is_contiguous_across_pages() {
    for sort in [SortKey::Latest, SortKey::PriceAsc, SortKey::PriceDesc] {
        for (seller_total, global_total) in
            [(0, 0), (0, 13), (5, 50), (7, 0), (20, 20), (23, 9), (41, 3)]
        {
            for page_size in [1, 3, 7, 20] {
                check_coverage(seller_total, global_total, page_size, sort).await;
            }
        }
    }
}
