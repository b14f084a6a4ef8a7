//! # Till Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Noodle Money Buddy Till                          │
//! │                                                                         │
//! │  main.rs ────► parse args, init logging, load config                   │
//! │                                                                         │
//! │  lib.rs ─────► open_repository (SQLite or --memory)                     │
//! │                                                                         │
//! │  commands/ ──► menu, order, report, export, config                      │
//! │                                                                         │
//! │  service.rs ─► TillService over Arc<dyn Repository>                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exits 0 on success, otherwise with the error's `ErrorCode::exit_code()`.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use noodle_till::commands::{self, Cli, Command, Output};
use noodle_till::{init_tracing, open_repository, AppResult, TillConfig, TillService};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let config = match TillConfig::load(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => {
            Output {
                json: cli.json,
                currency_symbol: String::new(),
            }
            .error(&err);
            return ExitCode::from(err.code().exit_code());
        }
    };
    let out = Output::new(cli.json, &config);

    match run(cli, &config, &out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            out.error(&err);
            ExitCode::from(err.code().exit_code())
        }
    }
}

async fn run(cli: Cli, config: &TillConfig, out: &Output) -> AppResult<()> {
    match cli.command {
        Command::Config { command } => commands::run_config(command, config, cli.config, out),
        command => {
            let repo = open_repository(config, cli.memory).await?;
            let service = TillService::new(repo, config);
            debug!(?command, "Dispatching");

            commands::dispatch(command, &service, out).await
        }
    }
}
