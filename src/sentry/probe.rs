//! HEAD probes and their classification.

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::catalog::MappingHealth;
use crate::config::{HTML_CONTENT_TYPE, MIRROR_DOWN_STATUS};
use crate::error_handling::ProbeError;

/// The parts of a location response that decide its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
}

/// Probes a mirror root.
///
/// Fails on a transport error or a status of 500 and above. Redirect
/// handling is whatever the client's policy allows.
pub async fn head_mirror(client: &reqwest::Client, base_url: &str) -> Result<StatusCode, ProbeError> {
    let response = client
        .head(base_url)
        .send()
        .await
        .map_err(ProbeError::transport)?;
    let status = response.status();
    if status.as_u16() >= MIRROR_DOWN_STATUS {
        return Err(ProbeError::BadStatus(status));
    }
    Ok(status)
}

/// Probes one download URL.
pub async fn head_location(client: &reqwest::Client, url: &str) -> Result<ProbeResponse, ProbeError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(ProbeError::transport)?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Ok(ProbeResponse {
        status: response.status(),
        content_type,
    })
}

/// Maps a location response to mapping health.
///
/// A 200 that serves HTML is an error page, not the file.
pub fn classify(response: &ProbeResponse) -> MappingHealth {
    match response.status {
        StatusCode::OK if !is_html(response.content_type.as_deref()) => MappingHealth::HEALTHY,
        StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => MappingHealth::PRUNED,
        _ => MappingHealth::DEGRADED,
    }
}

fn is_html(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains(HTML_CONTENT_TYPE))
}
