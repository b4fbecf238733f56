//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, pool sizes, defaults)
//! - Library configuration structs
//! - CLI option types and parsing

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, SentryArgs, ServeArgs, SetRatingArgs};
pub use constants::*;
pub use types::{LogFormat, LogLevel, ProbeConfig, ResolverConfig, ServerConfig, SweepParams};
