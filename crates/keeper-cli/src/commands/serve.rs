//! Run the notifier in the foreground.

use clap::Args;

use keeper_core::error::AppError;
use keeper_worker::NotifierEngine;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the scan interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Skip migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;
    if let Some(interval) = args.interval {
        config.notifier.scan_interval_seconds = interval;
        config.validate()?;
    }

    let db = super::create_db_pool(&config).await?;
    if config.database.auto_migrate && !args.no_migrate {
        keeper_database::migration::run_migrations(db.pool()).await?;
    }

    let engine = NotifierEngine::from_config(&config, &db)?;
    engine.start().await?;
    println!(
        "Notifier running (scan every {}s). Press Ctrl+C to stop.",
        config.notifier.scan_interval_seconds
    );

    tokio::signal::ctrl_c().await?;

    println!("Stopping...");
    engine.stop().await;
    db.close().await;
    Ok(())
}
