//! Shared resource setup.
//!
//! This module provides the constructors for resources shared across tasks:
//! - HTTP probe client (timeouts and redirect policy)
//! - Logger
//! - Worker-pool semaphores

mod client;
mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::init_probe_client;
pub use logger::init_logger_with;

/// Initializes a semaphore bounding a worker pool.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}
