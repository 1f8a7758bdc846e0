//! todo-server binary.
//!
//! # Environment Variables
//!
//! - `HOST` / `PORT`: bind address (default `0.0.0.0:9000`)
//! - `MONGODB_URI`, `MONGODB_DATABASE`, `MONGODB_COLLECTION`: storage location
//! - `TODO_STORAGE`: `mongo` (default) or `memory`
//! - `SHUTDOWN_GRACE_SECS`, `REQUEST_TIMEOUT_SECS`
//! - `RUST_LOG`: log filter (default `info,tower_http=debug`)

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use todo_core::{InMemoryRepository, TodoRepository};
use todo_server::{
    close_storage, create_router, run, shutdown_signal, AppState, Config, StorageBackend,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_target(true)
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let repository = open_storage(&config).await?;

    let app = create_router(AppState::new(Arc::clone(&repository)), config.request_timeout);
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    run(listener, app, shutdown_signal(), config.shutdown_grace).await?;

    close_storage(repository.as_ref(), config.shutdown_grace).await;
    info!("server stopped");
    Ok(())
}

async fn open_storage(config: &Config) -> anyhow::Result<Arc<dyn TodoRepository>> {
    match config.storage {
        StorageBackend::Memory => {
            info!("using in-memory storage");
            Ok(Arc::new(InMemoryRepository::new()))
        }
        #[cfg(feature = "mongo")]
        StorageBackend::Mongo => {
            let repo = todo_server::mongo::MongoRepository::connect(config)
                .await
                .with_context(|| format!("cannot reach MongoDB at {}", config.mongo_uri))?;
            Ok(Arc::new(repo))
        }
        #[cfg(not(feature = "mongo"))]
        StorageBackend::Mongo => {
            anyhow::bail!("built without the `mongo` feature; set TODO_STORAGE=memory")
        }
    }
}
