//! Blood sugar log service.
//!
//! Records blood-sugar readings over a small JSON API backed by SQLite.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server (axum + tower-http layers)
//!                    │
//!                    ▼
//!               http::handlers ──▶ store::LogStore ──▶ SQLite file
//!                                  (worker thread)
//!
//!     config ─▶ lifecycle::startup ─▶ serve ─▶ SIGINT/SIGTERM ─▶ drain ─▶ close store
//! ```

use std::path::PathBuf;

use blood_sugar_log::config::{load_config, validation::validate_config, ConfigError, ServiceConfig};
use blood_sugar_log::lifecycle::startup;
use blood_sugar_log::observability::logging;
use clap::Parser;

#[derive(Parser)]
#[command(name = "blood-sugar-log")]
#[command(about = "Blood sugar reading log service", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override storage.database_path.
    #[arg(short, long)]
    database: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(database) = &cli.database {
        config.storage.database_path = database.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("blood-sugar-log v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
