//! Front end request and response types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::resolver::Resolver;

/// Shared state for the front end handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(resolver: Arc<Resolver>, config: ServerConfig) -> Self {
        Self {
            resolver,
            config: Arc::new(config),
        }
    }
}

/// Raw query string of a download request.
#[derive(Debug, Default, Deserialize)]
pub struct BouncerQuery {
    pub product: Option<String>,
    pub os: Option<String>,
    pub lang: Option<String>,
    pub print: Option<String>,
}

/// A download request with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BouncerParams {
    pub product: String,
    pub os: String,
    pub lang: String,
    /// `print=yes`: answer with the URL instead of redirecting
    pub print_only: bool,
}

impl BouncerParams {
    /// Normalizes a query; `None` when it names no product.
    ///
    /// Product and OS are trimmed and lowercased. Language codes are passed
    /// through as given.
    pub fn from_query(query: BouncerQuery, config: &ServerConfig) -> Option<Self> {
        let product = normalize(query.product);
        if product.is_empty() {
            return None;
        }

        let mut os = normalize(query.os);
        if os.is_empty() {
            os = config.default_os.clone();
        }

        let lang = match query.lang {
            Some(lang) if !lang.is_empty() => lang,
            _ => config.default_lang.clone(),
        };

        Some(Self {
            product,
            os,
            lang,
            print_only: query.print.as_deref() == Some("yes"),
        })
    }
}

fn normalize(value: Option<String>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

/// JSON body of the heartbeat endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartbeatResponse {
    pub db: bool,
    pub healthy: bool,
    pub version: String,
}
