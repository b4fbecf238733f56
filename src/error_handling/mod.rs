//! Error handling and probe statistics.
//!
//! This module provides:
//! - The error taxonomy (store, sentry, probe, server, initialization)
//! - Categorization of transport failures
//! - Per-run probe statistics
//!
//! "Not found" conditions are not errors anywhere in this crate: lookups
//! return `Option` and the front end maps a miss to 404.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, update_error_stats};
pub use stats::ProbeStats;
pub use types::{
    ErrorType, InitializationError, OutcomeType, ProbeError, SentryError, ServerError, StoreError,
};
