//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled on Ctrl-C.
///
/// The watcher task lives until the signal arrives or the token is cancelled
/// by someone else.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let watched = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => log::info!("Interrupt received, shutting down"),
                    Err(e) => log::warn!("Failed to listen for Ctrl-C: {}", e),
                }
                watched.cancel();
            }
            _ = watched.cancelled() => {}
        }
    });
    token
}

/// Cancels `cancel` and waits for `task` to finish.
pub async fn shutdown_gracefully<T>(cancel: CancellationToken, task: tokio::task::JoinHandle<T>) -> Option<T> {
    cancel.cancel();
    match task.await {
        Ok(value) => Some(value),
        Err(join_error) => {
            log::warn!("Background task panicked during shutdown: {:?}", join_error);
            None
        }
    }
}
