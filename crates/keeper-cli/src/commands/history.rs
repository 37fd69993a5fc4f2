//! Notification history lookups.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use keeper_core::error::AppError;
use keeper_core::types::id::UserId;
use keeper_database::repositories::NotificationLogRepository;

use crate::output::{self, OutputFormat};

/// Arguments for the history command
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// User to show
    pub user_id: Uuid,

    /// Maximum number of entries
    #[arg(short, long, default_value_t = 50)]
    pub limit: i64,
}

#[derive(Debug, Serialize, Tabled)]
struct HistoryRow {
    #[tabled(rename = "Day")]
    notified_on: String,
    #[tabled(rename = "Record")]
    record_id: String,
    #[tabled(rename = "Dispatched At")]
    dispatched_at: String,
}

/// Execute the history command
pub async fn execute(
    args: &HistoryArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let repo = NotificationLogRepository::new(db.pool().clone());

    let entries = repo
        .find_by_user(&UserId::from_uuid(args.user_id), args.limit)
        .await?;
    let rows: Vec<HistoryRow> = entries
        .into_iter()
        .map(|e| HistoryRow {
            notified_on: e.notified_on.to_string(),
            record_id: e.record_id.to_string(),
            dispatched_at: e.dispatched_at.to_rfc3339(),
        })
        .collect();

    output::print_list(&rows, format);
    db.close().await;
    Ok(())
}
