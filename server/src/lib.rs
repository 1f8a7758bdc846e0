//! HTTP service for the todo collection.
//!
//! # Overview
//! An axum router over five routes (`GET /`, `GET|POST /todo/`,
//! `PUT|DELETE /todo/{id}`) plus `GET /health`. Handlers share one storage
//! handle through `AppState`; which storage that is gets decided in `main`.
//!
//! # Shutdown
//! `run` serves until the shutdown future resolves, then stops accepting
//! connections and gives in-flight requests `grace` to finish. After that
//! `run` returns without waiting further. Connection tasks axum already
//! spawned are not cancelled when the grace period runs out; they keep
//! running until the runtime shuts down. Storage is therefore released with
//! `close_storage`, which gives up after its own deadline instead of waiting
//! on those requests.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod router;
pub mod state;

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use todo_core::TodoRepository;

pub use config::{Config, StorageBackend};
pub use error::AppError;
pub use router::create_router;
pub use state::AppState;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Router over `repository` with the default request deadline.
pub fn app(repository: Arc<dyn TodoRepository>) -> Router {
    create_router(AppState::new(repository), DEFAULT_REQUEST_TIMEOUT)
}

/// Serve `app` on `listener` until `shutdown` resolves, then drain in-flight
/// requests for at most `grace`.
pub async fn run<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        biased;

        res = &mut server => return res,
        _ = signalled_rx => {
            info!(grace_secs = grace.as_secs_f64(), "shutdown signal received, draining requests");
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(res) => res,
        Err(_) => {
            warn!("grace period elapsed, dropping in-flight requests");
            Ok(())
        }
    }
}

/// Close `repository`, waiting at most `deadline`.
///
/// Returns `false` when the deadline elapsed first. Requests left running
/// after a timed-out drain may still hold storage resources, which would
/// otherwise keep `close` waiting.
pub async fn close_storage(repository: &dyn TodoRepository, deadline: Duration) -> bool {
    match tokio::time::timeout(deadline, repository.close()).await {
        Ok(()) => true,
        Err(_) => {
            warn!(deadline_secs = deadline.as_secs_f64(), "storage did not close in time");
            false
        }
    }
}

/// Resolves on the first SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
}
