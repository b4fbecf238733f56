//! Long-running process support.
//!
//! Periodic sentry scheduling and Ctrl-C driven shutdown for the binary.

pub mod schedule;
pub mod shutdown;

// Re-export public API
pub use schedule::run_periodic;
pub use shutdown::{shutdown_gracefully, shutdown_on_ctrl_c};
