//! Transport error categorization.

use super::stats::ProbeStats;
use super::types::{ErrorType, ProbeError};

/// Categorizes a `reqwest::Error` into an `ErrorType`.
///
/// Redirect errors are checked before timeouts so that a probe stopped by the
/// one-redirect policy is never reported as a slow server.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

impl ProbeError {
    /// Wraps a client error with its category.
    pub fn transport(source: reqwest::Error) -> Self {
        ProbeError::Transport {
            kind: categorize_reqwest_error(&source),
            source,
        }
    }
}

/// Records a transport failure in the run statistics.
///
/// Bad statuses are answers, not transport errors, and are not counted here.
pub fn update_error_stats(stats: &ProbeStats, error: &ProbeError) {
    if let ProbeError::Transport { kind, .. } = error {
        stats.increment_error(*kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_builder_error() {
        // A relative URL cannot be turned into a request
        let err = reqwest::Client::new()
            .head("not a url")
            .build()
            .expect_err("relative URL must not build");
        assert_eq!(
            categorize_reqwest_error(&err),
            ErrorType::HttpRequestBuilderError
        );
    }

    #[tokio::test]
    async fn test_categorize_connect_error() {
        // Bind then drop a listener so the port is known to be closed
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|l| l.local_addr())
            .expect("bind ephemeral port")
            .port();
        let err = reqwest::Client::new()
            .head(format!("http://127.0.0.1:{}/", port))
            .send()
            .await
            .expect_err("nothing listens on a released port");
        let category = categorize_reqwest_error(&err);
        assert!(
            matches!(
                category,
                ErrorType::HttpRequestConnectError | ErrorType::HttpRequestRequestError
            ),
            "unexpected category {:?}",
            category
        );

        let stats = ProbeStats::new();
        update_error_stats(&stats, &ProbeError::transport(err));
        update_error_stats(
            &stats,
            &ProbeError::BadStatus(reqwest::StatusCode::BAD_GATEWAY),
        );
        assert_eq!(stats.total_errors(), 1);
        assert_eq!(stats.get_error_count(category), 1);
    }
}
