//! HTTP front end.
//!
//! Endpoints:
//! - `/` - resolves a download request and redirects to a mirror
//! - `/__heartbeat__`, `/__lbheartbeat__` - catalog liveness as JSON

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::error_handling::ServerError;
use crate::resolver::Resolver;

use handlers::{bouncer_handler, heartbeat_handler};
pub use types::{AppState, BouncerParams, BouncerQuery, HeartbeatResponse};

/// Builds the front end router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(bouncer_handler))
        .route("/__heartbeat__", get(heartbeat_handler))
        .route("/__lbheartbeat__", get(heartbeat_handler))
        .with_state(state)
}

/// Binds `config.bind_addr` and serves until `shutdown` is cancelled.
pub async fn start_server(
    config: ServerConfig,
    resolver: Arc<Resolver>,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    let addr = config.bind_addr.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    log::info!("Bouncer listening on http://{}/", addr);
    log::info!("  - Heartbeat: http://{}/__heartbeat__", addr);

    serve(listener, AppState::new(resolver, config), shutdown).await
}

/// Serves the router on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), ServerError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(ServerError::Serve)
}
