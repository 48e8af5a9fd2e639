use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    map_search_error, parse_page, parse_sort, ApiError, ApiResponse, AppState, PageView,
    ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

/// `GET /search?q=&sort=&page=`: seller-first search across both catalogs.
pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<PageView>>, ApiError> {
    let sort = parse_sort(&req_id.0, query.sort.as_deref())?;
    let page = parse_page(&req_id.0, query.page.as_deref())?;
    let text = query.q.as_deref().unwrap_or_default();

    let result = state
        .paginator
        .search(text, sort, page)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
