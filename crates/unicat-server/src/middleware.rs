use axum::{
    extract::Request,
    http::{header::LOCATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use unicat_core::{resolve_legacy_path, LegacyResolution};
use uuid::Uuid;

/// Bytes escaped when a path is written into a `Location` header. `/` is
/// left alone so segment boundaries survive.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Permanently redirects old `/products/SELLER_42` style URLs to the
/// canonical path with the placeholder slug. The product page then
/// redirects once more to the real slug.
///
/// The query string, if any, is carried over.
pub async fn redirect_legacy_paths(req: Request, next: Next) -> Response {
    match resolve_legacy_path(req.uri().path()) {
        LegacyResolution::LegacyPathMatched { location } => {
            let location = match req.uri().query() {
                Some(query) => format!("{location}?{query}"),
                None => location,
            };
            tracing::debug!(
                from = %req.uri().path(),
                to = %location,
                "legacy product url redirect"
            );
            permanent_redirect(&location)
        }
        LegacyResolution::Passthrough => next.run(req).await,
    }
}

/// Percent-encodes a path for use as a redirect target. Slugs keep non-Latin
/// scripts, which a header value cannot carry raw.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// `301 Moved Permanently` to `location`, which must already be encoded.
pub fn permanent_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!(location, error = %e, "redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_path_keeps_ascii_slugs_and_separators() {
        assert_eq!(
            encode_path("/products/SELLER/42/Linen-Shirt"),
            "/products/SELLER/42/Linen-Shirt"
        );
    }

    #[test]
    fn encode_path_escapes_non_ascii_and_reserved_bytes() {
        assert_eq!(
            encode_path("/products/GLOBAL/3/노트"),
            "/products/GLOBAL/3/%EB%85%B8%ED%8A%B8"
        );
        assert_eq!(
            encode_path("/products/GLOBAL/3/100%-Cotton#1"),
            "/products/GLOBAL/3/100%25-Cotton%231"
        );
    }

    #[test]
    fn permanent_redirect_sets_location() {
        let response = permanent_redirect("/products/SELLER/42/product");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some("/products/SELLER/42/product")
        );
    }
}
