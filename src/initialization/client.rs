//! HTTP client initialization.
//!
//! The sentry builds one probe client per instance and shares it across every
//! mirror and location task of its runs.

use reqwest::redirect::{Attempt, Policy};
use reqwest::ClientBuilder;

use crate::config::{ProbeConfig, MAX_PROBE_REDIRECTS};

/// Initializes the HTTP client used by health probes.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header, request timeout and connect timeout from `config`
/// - A redirect policy that follows one redirect and fails on the next
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_probe_client(config: &ProbeConfig) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(Policy::custom(probe_redirect_policy))
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()
}

fn probe_redirect_policy(attempt: Attempt) -> reqwest::redirect::Action {
    // `previous` holds every URL already requested, starting with the original
    if attempt.previous().len() > MAX_PROBE_REDIRECTS {
        attempt.error(format!("stopped after {} redirect", MAX_PROBE_REDIRECTS))
    } else {
        attempt.follow()
    }
}
