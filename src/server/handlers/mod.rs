//! Front end HTTP handlers.

mod bouncer;
mod heartbeat;

pub use bouncer::bouncer_handler;
pub use heartbeat::heartbeat_handler;

use std::time::Duration;

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::Response;

/// Sets `Cache-Control: max-age` unless `max_age` is zero.
fn set_max_age(response: &mut Response, max_age: Duration) {
    if max_age.is_zero() {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age.as_secs())) {
        response.headers_mut().insert(CACHE_CONTROL, value);
    }
}
