//! Warranty Keeper server: runs the expiration notifier until signalled.

use tracing_subscriber::{EnvFilter, fmt};

use keeper_core::config::AppConfig;
use keeper_core::error::AppError;
use keeper_database::DatabasePool;
use keeper_worker::NotifierEngine;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `KEEPER_CONFIG` (default `config/default.toml`)
/// overlaid with `KEEPER__*` environment variables.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("KEEPER_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Warranty Keeper v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect(&config.database).await?;
    if config.database.auto_migrate {
        keeper_database::migration::run_migrations(db.pool()).await?;
    }

    let engine = NotifierEngine::from_config(&config, &db)?;
    engine.start().await?;

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping notifier...");

    engine.stop().await;
    db.close().await;

    tracing::info!("Warranty Keeper stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
