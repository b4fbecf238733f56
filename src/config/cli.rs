//! Command-line options.
//!
//! Parsed with `clap`; every flag that configures a deployment also reads a
//! `BOUNCER_*` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Serve redirects
//! mirror_bouncer serve --addr 0.0.0.0:8888 --pinned-baseurl-https cdn.example.com/pub
//!
//! # One sweep over every active mirror
//! mirror_bouncer sentry --mirror-routines 5 --location-routines 15
//!
//! # Sweep a single mirror every ten minutes
//! mirror_bouncer sentry --mirror 12 --interval-seconds 600
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::constants::{
    DB_PATH, DEFAULT_BIND_ADDR, DEFAULT_LOCATION_POOL_SIZE, DEFAULT_MIRROR_POOL_SIZE,
    DEFAULT_PIN_HTTPS_HEADER, DEFAULT_PROBE_LANG, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::config::types::{
    LogFormat, LogLevel, ProbeConfig, ResolverConfig, ServerConfig, SweepParams,
};

/// Top-level command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "mirror_bouncer",
    version,
    about = "Redirects download requests to healthy mirrors and keeps mirror health fresh."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, global = true, env = "BOUNCER_DB_PATH", default_value = DB_PATH)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// What to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the redirect front end
    Serve(ServeArgs),
    /// Probe mirrors and locations and persist their health
    Sentry(SentryArgs),
    /// Change a mirror's selection weight
    SetRating(SetRatingArgs),
}

/// Options for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address on which to listen
    #[arg(long, env = "BOUNCER_ADDR", default_value = DEFAULT_BIND_ADDR)]
    pub addr: String,

    /// Time, in seconds, for Cache-Control max-age
    #[arg(long, default_value_t = 60)]
    pub cache_time: u64,

    /// If the request header value equals https, the HTTPS mirror group is used
    #[arg(long, env = "BOUNCER_PIN_HTTPS_HEADER_NAME", default_value = DEFAULT_PIN_HTTPS_HEADER)]
    pub pin_https_header_name: String,

    /// Base URL for HTTP products, without scheme (bypasses mirror selection)
    #[arg(long = "pinned-baseurl-http", env = "BOUNCER_PINNED_BASEURL_HTTP")]
    pub pinned_base_url_http: Option<String>,

    /// Base URL for HTTPS products, without scheme (bypasses mirror selection)
    #[arg(long = "pinned-baseurl-https", env = "BOUNCER_PINNED_BASEURL_HTTPS")]
    pub pinned_base_url_https: Option<String>,

    /// Where requests without a product are redirected
    #[arg(long, env = "BOUNCER_FALLBACK_URL")]
    pub fallback_url: Option<String>,
}

impl ServeArgs {
    /// Front end settings from these options.
    pub fn server_config(&self) -> ServerConfig {
        let header = self.pin_https_header_name.trim();
        ServerConfig {
            bind_addr: self.addr.clone(),
            cache_time: Duration::from_secs(self.cache_time),
            pin_https_header: (!header.is_empty()).then(|| header.to_string()),
            fallback_url: self.fallback_url.clone(),
            ..Default::default()
        }
    }

    /// Resolver settings from these options.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            pinned_base_url_http: self.pinned_base_url_http.clone(),
            pinned_base_url_https: self.pinned_base_url_https.clone(),
        }
    }
}

/// Options for `sentry`.
#[derive(Debug, Args)]
pub struct SentryArgs {
    /// Only check locations of products marked with checknow
    #[arg(long)]
    pub checknow: bool,

    /// If set, checks a specific mirror (id, or text matched against base URL and name)
    #[arg(long)]
    pub mirror: Option<String>,

    /// How many mirrors can be checked at once
    #[arg(long, default_value_t = DEFAULT_MIRROR_POOL_SIZE)]
    pub mirror_routines: usize,

    /// How many locations of one mirror can be checked at once
    #[arg(long, default_value_t = DEFAULT_LOCATION_POOL_SIZE)]
    pub location_routines: usize,

    /// Language substituted into location paths when probing
    #[arg(long, default_value = DEFAULT_PROBE_LANG)]
    pub probe_lang: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_PROBE_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Repeat the sweep on this interval until interrupted
    #[arg(long)]
    pub interval_seconds: Option<u64>,
}

impl SentryArgs {
    /// Sweep parameters from these options.
    pub fn sweep_params(&self) -> SweepParams {
        SweepParams {
            check_now_only: self.checknow,
            single_mirror: self.mirror.clone(),
            mirror_pool_size: self.mirror_routines,
            location_pool_size: self.location_routines,
        }
    }

    /// Probe settings from these options.
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            probe_lang: self.probe_lang.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
            ..Default::default()
        }
    }

    /// Periodic interval, if one was requested.
    pub fn interval(&self) -> Option<Duration> {
        self.interval_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Options for `set-rating`.
#[derive(Debug, Args)]
pub struct SetRatingArgs {
    /// Mirror id
    #[arg(long)]
    pub mirror: i64,

    /// New selection weight
    #[arg(long)]
    pub rating: u32,
}
