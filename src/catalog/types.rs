//! Catalog domain types.

use std::fmt;

/// The serving group a mirror belongs to, determined by its base URL scheme.
///
/// Candidate pools are always drawn from exactly one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeGroup {
    Http,
    Https,
}

impl SchemeGroup {
    /// Group for a request: HTTPS when preferred or when the product demands it.
    pub fn effective(prefer_https: bool, ssl_only: bool) -> Self {
        if prefer_https || ssl_only {
            SchemeGroup::Https
        } else {
            SchemeGroup::Http
        }
    }

    /// Base URL prefix of mirrors in this group.
    pub fn prefix(&self) -> &'static str {
        match self {
            SchemeGroup::Http => "http://",
            SchemeGroup::Https => "https://",
        }
    }
}

impl fmt::Display for SchemeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemeGroup::Http => f.write_str("http"),
            SchemeGroup::Https => f.write_str("https"),
        }
    }
}

/// A product matched for a requested language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMatch {
    pub id: i64,
    /// Must be served from the HTTPS group only
    pub ssl_only: bool,
}

/// A (product, OS) download path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: i64,
    /// Path template containing the `:lang` placeholder
    pub path: String,
}

/// A mirror as seen by the resolver: a selection candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCandidate {
    pub id: i64,
    pub base_url: String,
    /// Selection weight
    pub rating: u32,
}

/// A mirror as seen by the sentry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    pub id: i64,
    pub name: String,
    pub base_url: String,
    pub rating: u32,
    pub active: bool,
    pub healthy: bool,
}

/// Health of one (location, mirror) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingHealth {
    /// Kept in rotation
    pub active: bool,
    /// Served correctly at the last probe
    pub healthy: bool,
}

impl MappingHealth {
    /// 200 with a real file.
    pub const HEALTHY: MappingHealth = MappingHealth {
        active: true,
        healthy: true,
    };
    /// 403/404: not published there.
    pub const PRUNED: MappingHealth = MappingHealth {
        active: false,
        healthy: false,
    };
    /// Anything else: kept as a degraded fallback candidate.
    pub const DEGRADED: MappingHealth = MappingHealth {
        active: true,
        healthy: false,
    };
}

/// One audit record appended per mirror per sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthLogEntry {
    /// Run start, shared by every entry of a sweep (epoch milliseconds)
    pub logged_at_ms: i64,
    pub mirror_id: i64,
    pub active: bool,
    pub rating: u32,
    pub reason: String,
}

/// Which active mirrors a sweep probes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorFilter {
    All,
    Id(i64),
    /// Substring of base URL or name
    Matching(String),
}

impl MirrorFilter {
    /// Numeric arguments select by id, anything else by substring.
    pub fn from_arg(arg: &str) -> Self {
        match arg.parse::<i64>() {
            Ok(id) => MirrorFilter::Id(id),
            Err(_) => MirrorFilter::Matching(arg.to_string()),
        }
    }
}

/// Which active locations a sweep probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFilter {
    All,
    /// Only products flagged for an immediate re-check
    CheckNowOnly,
}
