//! One-shot expiration scan.

use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::watch;

use keeper_core::error::AppError;
use keeper_worker::NotifierEngine;
use keeper_worker::jobs::ScanPreview;

use crate::output::{self, OutputFormat};

/// Arguments for the scan command
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Day to evaluate (YYYY-MM-DD, UTC). Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Actually deliver notifications instead of previewing
    #[arg(long)]
    pub send: bool,
}

/// One candidate as shown by `keeper scan`.
#[derive(Debug, Serialize, Tabled)]
struct CandidateRow {
    #[tabled(rename = "Record")]
    record_id: String,
    #[tabled(rename = "User")]
    user_id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Days Left")]
    days_left: i64,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Gate")]
    gate: String,
}

impl From<&ScanPreview> for CandidateRow {
    fn from(preview: &ScanPreview) -> Self {
        let record = &preview.candidate.record;
        Self {
            record_id: record.id.to_string(),
            user_id: record.user_id.to_string(),
            product: record.product_name.clone(),
            expires: record
                .expiration_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            days_left: preview.candidate.days_left,
            tier: preview.candidate.tier.to_string(),
            gate: if preview.would_notify { "pending" } else { "sent today" }.to_string(),
        }
    }
}

/// Execute the scan command
pub async fn execute(args: &ScanArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let db = super::create_db_pool(&config).await?;
    let engine = NotifierEngine::from_config(&config, &db)?;
    let day = args.date.unwrap_or_else(|| Utc::now().date_naive());

    if args.send {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        let report = engine
            .expiration_job()
            .run_for_day(day, cancel_rx)
            .await
            .map_err(|e| AppError::internal(e.to_string()))?;
        output::print_item(&report, format);
    } else {
        let previews = engine.expiration_job().preview(day).await?;
        let rows: Vec<CandidateRow> = previews.iter().map(CandidateRow::from).collect();
        output::print_list(&rows, format);
    }

    db.close().await;
    Ok(())
}
