//! Hiring manager transfer inspection commands.

use std::str::FromStr;

use clap::{Args, Subcommand};
use sqlx::PgPool;
use tabled::Tabled;

use staffhub_core::config::AppConfig;
use staffhub_core::error::AppError;
use staffhub_core::types::pagination::PageRequest;
use staffhub_database::repositories::TransferRepository;
use staffhub_entity::transfer::{HiringManagerTransfer, TransferStatus};

use crate::output::{self, OutputFormat};

/// Arguments for transfer commands
#[derive(Debug, Args)]
pub struct TransfersArgs {
    /// Transfer subcommand
    #[command(subcommand)]
    pub command: TransfersCommand,
}

/// Transfer subcommands
#[derive(Debug, Subcommand)]
pub enum TransfersCommand {
    /// List transfer requests
    List {
        /// Only transfers in this status (pending, approved, denied)
        #[arg(short, long)]
        status: Option<String>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
}

#[derive(Tabled)]
struct TransferRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requested")]
    created_at: String,
    #[tabled(rename = "Denial Reason")]
    denial_reason: String,
}

impl From<&HiringManagerTransfer> for TransferRow {
    fn from(t: &HiringManagerTransfer) -> Self {
        Self {
            id: t.id.to_string(),
            source: t.source_hiring_manager_id.to_string(),
            target: t.target_hiring_manager_id.to_string(),
            status: t.status.to_string(),
            created_at: t.created_at.format("%Y-%m-%d %H:%M").to_string(),
            denial_reason: t.denial_reason.clone().unwrap_or_default(),
        }
    }
}

/// Execute transfer commands
pub async fn execute(
    args: &TransfersArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool: PgPool = super::create_db_pool(config).await?;
    let repo = TransferRepository::new(pool);

    match &args.command {
        TransfersCommand::List { status, page } => {
            let status = status
                .as_deref()
                .map(TransferStatus::from_str)
                .transpose()?;
            let transfers = repo.find_all(status, &PageRequest::new(*page, 50)).await?;
            let rows: Vec<TransferRow> = transfers.items.iter().map(TransferRow::from).collect();
            output::print_list(&rows, &transfers, format);
        }
    }

    Ok(())
}
