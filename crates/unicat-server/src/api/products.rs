use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use unicat_core::{canonical_url, parse_source_tag, ProductId};

use crate::middleware::{encode_path, permanent_redirect, RequestId};

use super::{
    map_identity_error, map_search_error, parse_page, parse_sort, ApiError, ApiResponse, AppState,
    PageView, ProductView, ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(super) struct ListingQuery {
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// `GET /products?sort=&page=`: enabled SELLER products only.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ApiResponse<PageView>>, ApiError> {
    let sort = parse_sort(&req_id.0, query.sort.as_deref())?;
    let page = parse_page(&req_id.0, query.page.as_deref())?;

    let result = state
        .paginator
        .list(sort, page)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `GET /products/{source}/{id}/{slug}`.
///
/// Any request path that differs from the product's canonical URL (stale
/// slug, placeholder slug, lowercase source, zero-padded id) is answered
/// with a 301 to the canonical URL.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path((source_tag, raw_id, slug)) =
        path.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    let source =
        parse_source_tag(&source_tag).map_err(|e| map_identity_error(req_id.0.clone(), &e))?;
    let id: ProductId = format!("{source}_{raw_id}")
        .parse()
        .map_err(|e| map_identity_error(req_id.0.clone(), &e))?;

    let product = state
        .paginator
        .find(id)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product {id} not found"),
            )
        })?;

    let canonical = canonical_url(&product);
    let requested = format!("/products/{source_tag}/{raw_id}/{slug}");
    if requested != canonical {
        tracing::debug!(
            product_id = %id,
            from = %requested,
            to = %canonical,
            "canonical product redirect"
        );
        return Ok(permanent_redirect(&encode_path(&canonical)));
    }

    Ok(Json(ApiResponse {
        data: ProductView::from(product),
        meta: ResponseMeta::new(req_id.0),
    })
    .into_response())
}
