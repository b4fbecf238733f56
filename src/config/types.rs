//! Configuration types.
//!
//! This module defines the library configuration structs and the enums shared
//! with the command-line parser. Every struct has a `Default` so it can be
//! constructed programmatically without any CLI dependencies.

use std::time::Duration;

use clap::ValueEnum;

use crate::catalog::{LocationFilter, MirrorFilter, SchemeGroup};
use crate::config::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_CACHE_TIME, DEFAULT_LANG, DEFAULT_LOCATION_POOL_SIZE,
    DEFAULT_MIRROR_POOL_SIZE, DEFAULT_OS, DEFAULT_PIN_HTTPS_HEADER, DEFAULT_PROBE_LANG,
    DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_USER_AGENT, PROBE_CONNECT_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// HTTP settings shared by every health probe of a sentry.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Language substituted for `:lang` in location paths
    pub probe_lang: String,

    /// Whole-request timeout
    pub timeout: Duration,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// HTTP User-Agent header value
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe_lang: DEFAULT_PROBE_LANG.to_string(),
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(PROBE_CONNECT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Effective parameters of one sweep trigger.
#[derive(Debug, Clone)]
pub struct SweepParams {
    /// Only probe locations of products flagged for an immediate re-check
    pub check_now_only: bool,

    /// Restrict the sweep to one mirror: a numeric id, or text matched
    /// against base URL and name
    pub single_mirror: Option<String>,

    /// How many mirrors are probed at once
    pub mirror_pool_size: usize,

    /// How many locations of one mirror are probed at once
    pub location_pool_size: usize,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            check_now_only: false,
            single_mirror: None,
            mirror_pool_size: DEFAULT_MIRROR_POOL_SIZE,
            location_pool_size: DEFAULT_LOCATION_POOL_SIZE,
        }
    }
}

impl SweepParams {
    /// Mirror selection for this sweep.
    pub fn mirror_filter(&self) -> MirrorFilter {
        match self.single_mirror.as_deref().map(str::trim) {
            None | Some("") => MirrorFilter::All,
            Some(text) => MirrorFilter::from_arg(text),
        }
    }

    /// Location selection for this sweep.
    pub fn location_filter(&self) -> LocationFilter {
        if self.check_now_only {
            LocationFilter::CheckNowOnly
        } else {
            LocationFilter::All
        }
    }

    /// Mirror pool size, never zero.
    pub fn mirror_permits(&self) -> usize {
        clamp_pool_size("mirror", self.mirror_pool_size)
    }

    /// Location pool size, never zero.
    pub fn location_permits(&self) -> usize {
        clamp_pool_size("location", self.location_pool_size)
    }
}

fn clamp_pool_size(pool: &str, size: usize) -> usize {
    if size == 0 {
        log::warn!("{} pool size of 0 is not usable, using 1", pool);
        1
    } else {
        size
    }
}

/// Deployment overrides for resolution.
///
/// A pinned base URL bypasses mirror selection (and therefore health data)
/// for its scheme group. Values are configured without a scheme, e.g.
/// `pinned-cdn.example.com/pub`.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// Pinned base URL for the HTTP group
    pub pinned_base_url_http: Option<String>,

    /// Pinned base URL for the HTTPS group
    pub pinned_base_url_https: Option<String>,
}

impl ResolverConfig {
    /// Scheme-qualified pinned base URL for `group`, if one is configured.
    pub fn pinned_base_url(&self, group: SchemeGroup) -> Option<String> {
        let pinned = match group {
            SchemeGroup::Http => self.pinned_base_url_http.as_deref(),
            SchemeGroup::Https => self.pinned_base_url_https.as_deref(),
        }?;
        let pinned = pinned.trim();
        if pinned.is_empty() {
            return None;
        }
        Some(format!("{}{}", group.prefix(), pinned))
    }
}

/// Front end settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: String,

    /// `Cache-Control: max-age` for resolved URLs (zero disables the header)
    pub cache_time: Duration,

    /// Header whose value `https` forces the HTTPS mirror group
    pub pin_https_header: Option<String>,

    /// Where requests without a product are redirected; 404 when unset
    pub fallback_url: Option<String>,

    /// OS used when a request omits one
    pub default_os: String,

    /// Language used when a request omits one
    pub default_lang: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cache_time: DEFAULT_CACHE_TIME,
            pin_https_header: Some(DEFAULT_PIN_HTTPS_HEADER.to_string()),
            fallback_url: None,
            default_os: DEFAULT_OS.to_string(),
            default_lang: DEFAULT_LANG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_sweep_params_default() {
        let params = SweepParams::default();
        assert_eq!(params.mirror_pool_size, 5);
        assert_eq!(params.location_pool_size, 15);
        assert!(!params.check_now_only);
        assert_eq!(params.mirror_filter(), MirrorFilter::All);
        assert_eq!(params.location_filter(), LocationFilter::All);
    }

    #[test]
    fn test_sweep_params_filters() {
        let params = SweepParams {
            check_now_only: true,
            single_mirror: Some("42".to_string()),
            ..Default::default()
        };
        assert_eq!(params.mirror_filter(), MirrorFilter::Id(42));
        assert_eq!(params.location_filter(), LocationFilter::CheckNowOnly);

        let params = SweepParams {
            single_mirror: Some("mirror.example".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.mirror_filter(),
            MirrorFilter::Matching("mirror.example".to_string())
        );

        let params = SweepParams {
            single_mirror: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.mirror_filter(), MirrorFilter::All);
    }

    #[test]
    fn test_zero_pool_sizes_are_clamped() {
        let params = SweepParams {
            mirror_pool_size: 0,
            location_pool_size: 0,
            ..Default::default()
        };
        assert_eq!(params.mirror_permits(), 1);
        assert_eq!(params.location_permits(), 1);
    }

    #[test]
    fn test_pinned_base_url() {
        let config = ResolverConfig {
            pinned_base_url_http: Some("cdn.example.com/pub".to_string()),
            pinned_base_url_https: None,
        };
        assert_eq!(
            config.pinned_base_url(SchemeGroup::Http).as_deref(),
            Some("http://cdn.example.com/pub")
        );
        assert_eq!(config.pinned_base_url(SchemeGroup::Https), None);

        let blank = ResolverConfig {
            pinned_base_url_http: Some("".to_string()),
            pinned_base_url_https: Some("secure.example.com".to_string()),
        };
        assert_eq!(blank.pinned_base_url(SchemeGroup::Http), None);
        assert_eq!(
            blank.pinned_base_url(SchemeGroup::Https).as_deref(),
            Some("https://secure.example.com")
        );
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8888");
        assert_eq!(config.cache_time, Duration::from_secs(60));
        assert_eq!(config.pin_https_header.as_deref(), Some("X-Forwarded-Proto"));
        assert_eq!(config.default_os, "win");
        assert_eq!(config.default_lang, "en-US");
        assert!(config.fallback_url.is_none());
    }
}
