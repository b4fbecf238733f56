//! Periodic sweeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::SweepParams;
use crate::error_handling::SentryError;
use crate::sentry::Sentry;

/// Runs a sweep every `period` until `cancel` fires.
///
/// The first sweep starts immediately. A sweep that outlasts `period` delays
/// the next tick instead of queueing a burst of catch-up runs. Failed sweeps
/// are logged and retried at the next tick.
///
/// Cancellation during a sweep drops it, which aborts its outstanding probe
/// tasks; mirrors it had not finished get no health log entry for that run.
///
/// Returns the number of sweeps that completed. Each sweep logs its own
/// report, so none are kept here.
pub async fn run_periodic(
    sentry: Arc<Sentry>,
    params: SweepParams,
    period: Duration,
    cancel: CancellationToken,
) -> usize {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut completed = 0usize;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                log::info!("Sweep interrupted by shutdown");
                break;
            }
            result = sentry.run(&params) => match result {
                Ok(_) => completed += 1,
                Err(SentryError::AlreadyRunning) => {
                    log::warn!("Skipping scheduled sweep: previous sweep still running");
                }
                Err(e) => log::error!("Scheduled sweep failed: {}", e),
            },
        }
    }

    log::info!("Periodic sentry stopped after {} sweep(s)", completed);
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogStore;
    use crate::storage::test_helpers::{
        create_test_pool, insert_location, insert_mirror, insert_os, insert_product,
    };
    use crate::storage::SqliteCatalog;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_run_periodic_stops_on_cancel() {
        let pool = create_test_pool().await;
        let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::new(pool));
        let sentry = Arc::new(Sentry::new(store, &Default::default()).unwrap());
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_periodic(
            sentry,
            SweepParams::default(),
            Duration::from_millis(50),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(180)).await;
        cancel.cancel();

        let completed = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        // Empty catalog: every sweep completes with nothing to check
        assert!(completed >= 2, "only {} sweep(s) ran", completed);
    }

    #[tokio::test]
    async fn test_run_periodic_keeps_going_after_failed_sweep() {
        let pool = create_test_pool().await;
        let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::new(pool.clone()));
        let sentry = Arc::new(Sentry::new(store, &Default::default()).unwrap());
        pool.close().await;
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_periodic(
            sentry,
            SweepParams::default(),
            Duration::from_millis(20),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!task.is_finished());
        cancel.cancel();

        let completed = task.await.unwrap();
        assert_eq!(completed, 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_sweep_stops_outstanding_probes() {
        let pool = create_test_pool().await;
        let os_id = insert_os(&pool, "win").await;
        let product_id = insert_product(&pool, "Firefox", false, true, false).await;
        insert_location(&pool, product_id, os_id, "/firefox/:lang/setup.exe").await;

        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/firefox/en-US/setup.exe"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;
        insert_mirror(&pool, "slow", &server.uri(), 50).await;

        let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::new(pool.clone()));
        let sentry = Arc::new(Sentry::new(store, &Default::default()).unwrap());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_periodic(
            Arc::clone(&sentry),
            SweepParams::default(),
            Duration::from_secs(60),
            cancel.clone(),
        ));

        // Let the sweep reach the slow location probe, then shut down
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(sentry.is_running());
        cancel.cancel();
        assert_eq!(task.await.unwrap(), 0);
        assert!(!sentry.is_running());

        // An orphaned location task would have written its mapping by now
        tokio::time::sleep(Duration::from_millis(700)).await;
        let mappings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM location_mirror_map")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(mappings, 0);
        let log_entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sentry_log")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(log_entries, 0);
    }
}
