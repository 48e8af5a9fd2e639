mod products;
mod search;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use unicat_core::{canonical_url, IdentityError, UnifiedProduct};
use unicat_search::{Paginator, SearchError, SearchPage, SortKey, UnknownSortKey};

use crate::middleware::{redirect_legacy_paths, request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub paginator: Paginator,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    seller_catalog: &'static str,
    global_catalog: &'static str,
}

/// A product as served over HTTP: the unified fields plus its canonical URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProductView {
    #[serde(flatten)]
    product: UnifiedProduct,
    canonical_url: String,
}

impl From<UnifiedProduct> for ProductView {
    fn from(product: UnifiedProduct) -> Self {
        let canonical_url = canonical_url(&product);
        Self {
            product,
            canonical_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PageView {
    combined: Vec<ProductView>,
    seller_count: usize,
    global_count: usize,
    total: u64,
    has_next_page: bool,
    partial: bool,
}

impl From<SearchPage> for PageView {
    fn from(page: SearchPage) -> Self {
        Self {
            combined: page.combined.into_iter().map(ProductView::from).collect(),
            seller_count: page.seller_count,
            global_count: page.global_count,
            total: page.total,
            has_next_page: page.has_next_page,
            partial: page.partial,
        }
    }
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Parses the optional `sort` query parameter; absent means `latest`.
pub(super) fn parse_sort(request_id: &str, raw: Option<&str>) -> Result<SortKey, ApiError> {
    match raw {
        None | Some("") => Ok(SortKey::default()),
        Some(raw) => raw
            .parse()
            .map_err(|e: UnknownSortKey| {
                ApiError::new(request_id, "validation_error", e.to_string())
            }),
    }
}

/// Parses the optional 1-based `page` query parameter. Absent, zero and
/// negative pages all mean the first page.
pub(super) fn parse_page(request_id: &str, raw: Option<&str>) -> Result<u32, ApiError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(1);
    };
    let page: i64 = raw.parse().map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("page must be an integer, got \"{raw}\""),
        )
    })?;
    Ok(u32::try_from(page.max(1)).unwrap_or(u32::MAX))
}

pub(super) fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "catalog query failed");
    ApiError::new(request_id, "internal_error", "catalog query failed")
}

pub(super) fn map_identity_error(request_id: String, error: &IdentityError) -> ApiError {
    ApiError::new(request_id, "bad_request", error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/search", get(search::search_products))
        .route("/products", get(products::list_products))
        .route(
            "/products/{source}/{id}/{slug}",
            get(products::get_product),
        )
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn(redirect_legacy_paths)),
        )
        .with_state(state)
}

async fn not_found(Extension(req_id): Extension<RequestId>) -> ApiError {
    ApiError::new(req_id.0, "not_found", "no such route")
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let (seller, global) = state.paginator.check_catalogs().await;

    for result in [&seller, &global] {
        if let Err(e) = result {
            tracing::warn!(source = %e.catalog(), error = %e, "health check: catalog unavailable");
        }
    }

    let label = |result: &Result<(), _>| if result.is_ok() { "ok" } else { "unavailable" };
    let healthy = seller.is_ok() && global.is_ok();
    let data = HealthData {
        status: if healthy { "ok" } else { "degraded" },
        seller_catalog: label(&seller),
        global_catalog: label(&global),
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse { data, meta }))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
