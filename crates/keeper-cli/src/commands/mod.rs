//! CLI command definitions and dispatch.

pub mod config;
pub mod history;
pub mod migrate;
pub mod scan;
pub mod serve;

use clap::{Parser, Subcommand};

use keeper_core::config::AppConfig;
use keeper_core::error::AppError;
use keeper_database::DatabasePool;

use crate::output::OutputFormat;

/// Warranty Keeper: warranty expiration notifier
#[derive(Debug, Parser)]
#[command(name = "keeper", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the notifier until interrupted
    Serve(serve::ServeArgs),
    /// Run or preview a single expiration scan
    Scan(scan::ScanArgs),
    /// Notification history for a user
    History(history::HistoryArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Scan(args) => scan::execute(args, &self.config, self.format).await,
            Commands::History(args) => history::execute(args, &self.config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}
