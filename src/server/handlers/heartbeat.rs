//! Heartbeat handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::super::types::{AppState, HeartbeatResponse};
use super::set_max_age;
use crate::catalog::CatalogStore;
use crate::config::HEARTBEAT_CACHE_TIME;

/// `GET /__heartbeat__` and `GET /__lbheartbeat__`: 200 while the catalog
/// answers, 500 otherwise.
pub async fn heartbeat_handler(State(state): State<AppState>) -> Response {
    let db = match state.resolver.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Heartbeat ping failed: {}", e);
            false
        }
    };

    let status = if db {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let body = HeartbeatResponse {
        db,
        healthy: db,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mut response = (status, Json(body)).into_response();
    set_max_age(&mut response, HEARTBEAT_CACHE_TIME);
    response
}
