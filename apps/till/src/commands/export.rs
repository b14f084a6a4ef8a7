//! # Export Commands
//!
//! CSV goes to stdout unless `--output` names a file. Without a range, every
//! day on record is exported.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::info;

use noodle_core::{DateRange, Period};

use super::{Output, RangeArgs};
use crate::error::AppResult;
use crate::service::TillService;

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Order ID,Date,Items,Total Amount,Status
    Orders(ExportArgs),
    /// Date,Total Sales,Order Count,Items Sold,Average Order Value
    Daily(ExportArgs),
    /// Rank,Item,Quantity Sold,Revenue
    Top {
        #[command(flatten)]
        args: ExportArgs,

        /// Number of items (default: statistics.top_items_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct Written {
    path: PathBuf,
    rows: usize,
}

pub async fn run(command: ExportCommand, service: &TillService, out: &Output) -> AppResult<()> {
    let (csv, output) = match command {
        ExportCommand::Orders(args) => {
            let range = resolve(&args, service)?;
            (service.export_orders(&range).await?, args.output)
        }
        ExportCommand::Daily(args) => {
            let range = resolve(&args, service)?;
            (service.export_daily_sales(&range).await?, args.output)
        }
        ExportCommand::Top { args, limit } => {
            let range = resolve(&args, service)?;
            (service.export_top_items(&range, limit).await?, args.output)
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &csv)?;
            let rows = data_rows(&csv);
            info!(?path, rows, "CSV exported");

            let written = Written { path, rows };
            out.emit(&written, || {
                format!("Wrote {} rows to {}", written.rows, written.path.display())
            })
        }
        None => {
            print!("{}", csv);
            Ok(())
        }
    }
}

fn resolve(args: &ExportArgs, service: &TillService) -> AppResult<DateRange> {
    args.range.resolve(service, Period::Custom(DateRange::all()))
}

/// Rows after the header.
fn data_rows(csv: &str) -> usize {
    csv.lines().count().saturating_sub(1)
}
