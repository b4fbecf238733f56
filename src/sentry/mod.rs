//! Health monitor ("sentry").
//!
//! A sweep probes every active mirror root and, for mirrors that answer,
//! every active location on that mirror, then writes the resulting health
//! back to the catalog. Two nested bounded pools cap outbound load:
//!
//! - a run-wide mirror pool (`mirror_pool_size` permits)
//! - a location pool per mirror probe (`location_pool_size` permits)
//!
//! so at most `mirror_pool_size * location_pool_size` location requests are
//! in flight, plus one root probe per mirror permit.
//!
//! Nothing a single mirror or location does aborts a sweep. Probe failures
//! become unhealthy classifications; store write failures are logged and
//! counted in the [`SweepReport`].
//!
//! Runs are serialized by a run lock. A trigger that arrives while a sweep is
//! in progress is rejected with [`SentryError::AlreadyRunning`] rather than
//! queued behind it.
//!
//! Dropping a `run` future before it completes aborts every mirror and
//! location task it spawned, so no task outlives the run lock. An interrupted
//! sweep writes no health log entries for the mirrors it had not finished.

mod log_buffer;
mod probe;
mod report;

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

pub use log_buffer::LockedLog;
pub use probe::{classify, head_location, head_mirror, ProbeResponse};
pub use report::SweepReport;

use crate::catalog::{CatalogStore, HealthLogEntry, Location, MappingHealth, Mirror};
use crate::config::{ProbeConfig, SweepParams};
use crate::error_handling::{
    update_error_stats, InitializationError, OutcomeType, ProbeStats, SentryError, StoreError,
};
use crate::initialization::{init_probe_client, init_semaphore};
use crate::resolver::{join_download_url, substitute_lang};

/// Runs health sweeps against a catalog.
pub struct Sentry {
    store: Arc<dyn CatalogStore>,
    client: reqwest::Client,
    probe_lang: String,
    run_lock: Mutex<()>,
    running: AtomicBool,
}

impl Sentry {
    /// Creates a sentry with a probe client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be
    /// built.
    pub fn new(
        store: Arc<dyn CatalogStore>,
        config: &ProbeConfig,
    ) -> Result<Self, InitializationError> {
        let client = init_probe_client(config)?;
        Ok(Self::with_client(store, client, config.probe_lang.clone()))
    }

    /// Creates a sentry probing through an existing client.
    pub fn with_client(
        store: Arc<dyn CatalogStore>,
        client: reqwest::Client,
        probe_lang: impl Into<String>,
    ) -> Self {
        Self {
            store,
            client,
            probe_lang: probe_lang.into(),
            run_lock: Mutex::new(()),
            running: AtomicBool::new(false),
        }
    }

    /// Whether a sweep is in progress.
    ///
    /// Reads a flag set while the run lock is held; never touches the lock.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs one complete sweep.
    ///
    /// Mirrors and locations are loaded once at the start; every health log
    /// entry of the run carries the same start timestamp.
    ///
    /// # Errors
    ///
    /// - `SentryError::AlreadyRunning` if another sweep is in progress
    /// - `SentryError::Store` if the run's mirrors or locations cannot be loaded
    pub async fn run(&self, params: &SweepParams) -> Result<SweepReport, SentryError> {
        let _run_guard = self
            .run_lock
            .try_lock()
            .map_err(|_| SentryError::AlreadyRunning)?;
        self.running.store(true, Ordering::SeqCst);
        let _running = RunningFlag(&self.running);

        let started_at = Utc::now();
        let start = Instant::now();

        let mirrors = self
            .store
            .all_active_mirrors(&params.mirror_filter())
            .await?;
        let locations = self
            .store
            .all_active_locations(params.location_filter())
            .await?;
        info!(
            "Sentry run starting: {} mirror(s), {} location(s), pools {}x{}",
            mirrors.len(),
            locations.len(),
            params.mirror_permits(),
            params.location_permits()
        );

        let sweep = Arc::new(Sweep {
            store: Arc::clone(&self.store),
            client: self.client.clone(),
            probe_lang: self.probe_lang.clone(),
            locations,
            logged_at_ms: started_at.timestamp_millis(),
            location_permits: params.location_permits(),
            stats: ProbeStats::new(),
        });

        let semaphore = init_semaphore(params.mirror_permits());
        let mut tasks = FuturesUnordered::new();
        let mut spawned = AbortOnDrop::default();

        for mirror in mirrors {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Mirror pool closed, skipping mirror {}", mirror.base_url);
                    continue;
                }
            };

            let sweep = Arc::clone(&sweep);
            let handle = tokio::spawn(async move {
                let _permit = permit;
                sweep.check_mirror(mirror).await;
            });
            spawned.track(handle.abort_handle());
            tasks.push(handle);
        }

        while let Some(task_result) = tasks.next().await {
            if let Err(join_error) = task_result {
                sweep.stats.increment_outcome(OutcomeType::TaskPanicked);
                warn!("Mirror task panicked: {:?}", join_error);
            }
        }

        let report = SweepReport::from_stats(started_at, start.elapsed(), &sweep.stats);
        report.log_summary();
        sweep.stats.log_summary();
        Ok(report)
    }
}

/// State shared by every task of one run.
struct Sweep {
    store: Arc<dyn CatalogStore>,
    client: reqwest::Client,
    probe_lang: String,
    locations: Vec<Location>,
    logged_at_ms: i64,
    location_permits: usize,
    stats: ProbeStats,
}

impl Sweep {
    async fn check_mirror(self: Arc<Self>, mirror: Mirror) {
        info!("Checking mirror {} ({})", mirror.name, mirror.base_url);
        let mirror_start = Instant::now();

        if let Err(e) = head_mirror(&self.client, &mirror.base_url).await {
            warn!("Mirror HEAD failed for {}: {}", mirror.base_url, e);
            self.stats.increment_outcome(OutcomeType::MirrorDown);
            update_error_stats(&self.stats, &e);

            self.record_write(
                "mirror health",
                &mirror.base_url,
                self.store.set_mirror_health(mirror.id, false).await,
            );
            let entry = self.log_entry(&mirror, false, e.to_string());
            self.record_write(
                "health log",
                &mirror.base_url,
                self.store.append_health_log(&entry).await,
            );
            return;
        }

        self.stats.increment_outcome(OutcomeType::MirrorUp);
        self.record_write(
            "mirror health",
            &mirror.base_url,
            self.store.set_mirror_health(mirror.id, true).await,
        );

        let mirror = Arc::new(mirror);
        let run_log = Arc::new(LockedLog::new());
        let semaphore = init_semaphore(self.location_permits);
        let mut tasks = FuturesUnordered::new();
        let mut spawned = AbortOnDrop::default();

        for location in &self.locations {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!(
                        "Location pool closed, skipping {} on {}",
                        location.path, mirror.base_url
                    );
                    continue;
                }
            };

            let sweep = Arc::clone(&self);
            let mirror = Arc::clone(&mirror);
            let run_log = Arc::clone(&run_log);
            let location = location.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                sweep.check_location(&mirror, &location, &run_log).await;
            });
            spawned.track(handle.abort_handle());
            tasks.push(handle);
        }

        while let Some(task_result) = tasks.next().await {
            if let Err(join_error) = task_result {
                self.stats.increment_outcome(OutcomeType::TaskPanicked);
                warn!(
                    "Location task for {} panicked: {:?}",
                    mirror.base_url, join_error
                );
            }
        }

        let elapsed = mirror_start.elapsed();
        info!("Finished {} in {:.2?}", mirror.base_url, elapsed);
        run_log.push_line(&format!("{} finished in {:.2?}", mirror.base_url, elapsed));

        let entry = self.log_entry(&mirror, true, run_log.take());
        self.record_write(
            "health log",
            &mirror.base_url,
            self.store.append_health_log(&entry).await,
        );
    }

    async fn check_location(&self, mirror: &Mirror, location: &Location, run_log: &LockedLog) {
        let path = substitute_lang(&location.path, &self.probe_lang);
        let url = join_download_url(&mirror.base_url, &path);

        let start = Instant::now();
        let result = head_location(&self.client, &url).await;
        let elapsed = start.elapsed();

        let health = match result {
            Ok(response) => {
                let line = format!("{} TOOK={:.2?} RC={}", url, elapsed, response.status.as_u16());
                info!("{}", line);
                run_log.push_line(&line);
                classify(&response)
            }
            Err(e) => {
                let line = format!("{} TOOK={:.2?} ERR={}", url, elapsed, e);
                warn!("{}", line);
                run_log.push_line(&line);
                update_error_stats(&self.stats, &e);
                MappingHealth::DEGRADED
            }
        };
        debug!(
            "Location {} on mirror {}: active={} healthy={}",
            location.id, mirror.id, health.active, health.healthy
        );
        self.stats.increment_outcome(location_outcome(health));

        self.record_write(
            "location mapping",
            &url,
            self.store
                .upsert_location_mirror_health(location.id, mirror.id, health)
                .await,
        );
    }

    fn log_entry(&self, mirror: &Mirror, active: bool, reason: String) -> HealthLogEntry {
        HealthLogEntry {
            logged_at_ms: self.logged_at_ms,
            mirror_id: mirror.id,
            active,
            rating: mirror.rating,
            reason,
        }
    }

    fn record_write(&self, what: &str, subject: impl Display, result: Result<(), StoreError>) {
        if let Err(e) = result {
            self.stats.increment_outcome(OutcomeType::WriteFailure);
            warn!("Failed to write {} for {}: {}", what, subject, e);
        }
    }
}

/// Clears the running flag when a run ends, however it ends.
struct RunningFlag<'a>(&'a AtomicBool);

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Aborts tracked tasks when dropped.
///
/// Finished tasks ignore the abort, so a run that completes normally is
/// unaffected; a dropped run takes its still-pending tasks down with it.
#[derive(Default)]
struct AbortOnDrop(Vec<AbortHandle>);

impl AbortOnDrop {
    fn track(&mut self, handle: AbortHandle) {
        self.0.push(handle);
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

fn location_outcome(health: MappingHealth) -> OutcomeType {
    if health == MappingHealth::HEALTHY {
        OutcomeType::LocationHealthy
    } else if health == MappingHealth::PRUNED {
        OutcomeType::LocationPruned
    } else {
        OutcomeType::LocationDegraded
    }
}
