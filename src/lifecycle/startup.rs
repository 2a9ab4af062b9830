//! Startup orchestration.
//!
//! Order: metrics → store → listener → serve. Any startup error is fatal.
//! On shutdown the HTTP server drains first, then the store is closed.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::store::{LogStore, StoreError};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open log store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("blocking store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Everything the service needs before accepting traffic.
pub struct Prepared {
    pub config: ServiceConfig,
    pub store: LogStore,
    pub listener: TcpListener,
}

impl Prepared {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

/// Open the store and bind the listener.
pub async fn prepare(config: ServiceConfig) -> Result<Prepared, StartupError> {
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr)?;
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Opening creates the file and schema and waits on the worker thread.
    let database_path = config.storage.database_path.clone();
    let store = tokio::task::spawn_blocking(move || LogStore::open(database_path)).await??;

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    Ok(Prepared {
        config,
        store,
        listener,
    })
}

/// Serve a prepared service until `shutdown` fires, then close the store.
pub async fn serve(
    prepared: Prepared,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    let Prepared {
        config,
        store,
        listener,
    } = prepared;

    let server = HttpServer::new(config, store.clone());
    let result = server.run(listener, shutdown).await;

    // Closing joins the worker thread after its queued operations finish.
    tokio::task::spawn_blocking(move || store.close()).await?;
    result.map_err(StartupError::from)
}

/// Run the service until SIGINT/SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.storage.database_path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let prepared = prepare(config).await?;
    tracing::info!(address = %prepared.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);
    serve(prepared, stop).await
}
