//! Download redirect handler.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use super::super::types::{AppState, BouncerParams, BouncerQuery};
use super::set_max_age;

/// `GET /?product=..&os=..&lang=..[&print=yes]`
///
/// - no product: 302 to the fallback URL, or 404 without one
/// - resolved: 302 to the download, or 200 `text/plain` with `print=yes`
/// - not resolvable: 404
/// - store failure: 500
pub async fn bouncer_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BouncerQuery>,
) -> Response {
    let Some(params) = BouncerParams::from_query(query, &state.config) else {
        return match state.config.fallback_url.as_deref() {
            Some(fallback) => found(fallback),
            None => StatusCode::NOT_FOUND.into_response(),
        };
    };

    let prefer_https = pins_https(&headers, state.config.pin_https_header.as_deref());
    let resolved = state
        .resolver
        .resolve(&params.product, &params.os, &params.lang, prefer_https)
        .await;

    let url = match resolved {
        Ok(Some(url)) => url,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            log::error!(
                "Resolving {}/{}/{} failed: {}",
                params.product,
                params.os,
                params.lang,
                e
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.").into_response();
        }
    };

    let mut response = if params.print_only {
        ([(header::CONTENT_TYPE, "text/plain")], url).into_response()
    } else {
        found(&url)
    };
    set_max_age(&mut response, state.config.cache_time);
    response
}

/// Whether the configured pin header asks for HTTPS mirrors.
fn pins_https(headers: &HeaderMap, header_name: Option<&str>) -> bool {
    let Some(name) = header_name.filter(|n| !n.is_empty()) else {
        return false;
    };
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "https")
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
