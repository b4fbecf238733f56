//! Configuration constants.
//!
//! Defaults for the sentry, resolver, and front end. All of them can be
//! overridden through the library config structs or the CLI.

use std::time::Duration;

/// Default SQLite database path.
pub const DB_PATH: &str = "./mirror_bouncer.db";

/// Placeholder replaced with a language code in location path templates.
pub const LANG_PLACEHOLDER: &str = ":lang";

// Sentry
/// Language substituted into location paths when probing.
pub const DEFAULT_PROBE_LANG: &str = "en-US";
/// How many mirrors are probed at once.
pub const DEFAULT_MIRROR_POOL_SIZE: usize = 5;
/// How many locations of a single mirror are probed at once.
pub const DEFAULT_LOCATION_POOL_SIZE: usize = 15;
/// Per-request probe timeout in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;
/// TCP connect timeout for probes in seconds.
pub const PROBE_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Redirects a probe may follow; the next one fails the probe.
pub const MAX_PROBE_REDIRECTS: usize = 1;
/// Mirror roots answering with a status at or above this are down.
pub const MIRROR_DOWN_STATUS: u16 = 500;
/// A location answering 200 with this content type is an error page.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// User-Agent sent by health probes.
pub const DEFAULT_USER_AGENT: &str = concat!("mirror_bouncer-sentry/", env!("CARGO_PKG_VERSION"));

// Front end
/// Address the front end listens on.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8888";
/// `Cache-Control: max-age` for resolved redirects.
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(60);
/// `Cache-Control: max-age` for heartbeat responses.
pub const HEARTBEAT_CACHE_TIME: Duration = Duration::from_secs(5);
/// Request header whose value `https` pins the HTTPS mirror group.
pub const DEFAULT_PIN_HTTPS_HEADER: &str = "X-Forwarded-Proto";
/// OS used when a request omits `os`.
pub const DEFAULT_OS: &str = "win";
/// Language used when a request omits `lang`.
pub const DEFAULT_LANG: &str = "en-US";
