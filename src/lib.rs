//! mirror_bouncer library: download redirection and mirror health sweeps
//!
//! Two halves share one catalog and never call each other:
//!
//! - the [`Resolver`] turns a (product, os, lang) request into a download URL
//!   on a rating-weighted, health-aware choice of mirror
//! - the [`Sentry`] HEAD-probes every active mirror and location through two
//!   nested bounded worker pools and writes their health back
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use mirror_bouncer::storage::init_db_pool_with_path;
//! use mirror_bouncer::{
//!     run_migrations, CatalogStore, ProbeConfig, Resolver, ResolverConfig, Sentry,
//!     SqliteCatalog, SweepParams,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = init_db_pool_with_path(Path::new("./mirror_bouncer.db")).await?;
//! run_migrations(&pool).await?;
//! let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::new(pool));
//!
//! let sentry = Sentry::new(Arc::clone(&store), &ProbeConfig::default())?;
//! let report = sentry.run(&SweepParams::default()).await?;
//! println!("{} mirror(s) checked, {} down", report.mirrors_checked, report.mirrors_unhealthy);
//!
//! let resolver = Resolver::new(store, ResolverConfig::default());
//! if let Some(url) = resolver.resolve("firefox-latest", "win64", "en-US", false).await? {
//!     println!("{}", url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod resolver;
pub mod sentry;
pub mod server;
pub mod storage;

// Re-export public API
pub use catalog::CatalogStore;
pub use config::{
    LogFormat, LogLevel, ProbeConfig, ResolverConfig, ServerConfig, SweepParams,
};
pub use resolver::{select_mirror, Resolver};
pub use sentry::{Sentry, SweepReport};
pub use storage::{run_migrations, SqliteCatalog};
