//! # Commands Module
//!
//! The `till` command line. Every subcommand parses its arguments, calls one
//! [`TillService`] method and prints the result.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Commands                                  │
//! │                                                                         │
//! │  Menu (menu.rs)                                                        │
//! │  ├── menu list [--available] [--category C] [--search S]               │
//! │  └── menu add <id> <name> <price> [--category C] [--unavailable]       │
//! │                                                                         │
//! │  Order (order.rs)                                                      │
//! │  ├── order new [--customer N] [--notes T]                              │
//! │  ├── order add <order> <item> [qty]                                    │
//! │  ├── order qty <order> <line|item> <qty>                               │
//! │  ├── order remove <order> <line|item>                                  │
//! │  ├── order pay <order> [amount]        (no amount: show amount due)    │
//! │  ├── order cancel|refund|show|discard <order>                          │
//! │  └── order list [range]                                                │
//! │                                                                         │
//! │  Report (report.rs)                                                    │
//! │  └── report [--period today|week|month|all] [--from D] [--to D]        │
//! │                                                                         │
//! │  Export (export.rs)                                                    │
//! │  └── export orders|daily|top [range] [--output FILE]                   │
//! │                                                                         │
//! │  Config                                                                 │
//! │  └── config show | config init [--force]                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `--json` switches every command to machine-readable output.

pub mod export;
pub mod menu;
pub mod order;
pub mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use noodle_core::{DateRange, Money, Period};

use crate::config::TillConfig;
use crate::error::{AppError, AppResult};
use crate::service::TillService;

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "till")]
#[command(about = "Noodle Money Buddy till")]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Demo mode: start from the sample menu in memory. Nothing is saved,
    /// so orders opened here are gone when the command exits
    #[arg(long, global = true, default_value_t = false)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse or edit the menu
    Menu {
        #[command(subcommand)]
        command: menu::MenuCommand,
    },
    /// Build, pay and manage orders
    Order {
        #[command(subcommand)]
        command: order::OrderCommand,
    },
    /// Sales statistics for a period
    Report(report::ReportArgs),
    /// CSV export
    Export {
        #[command(subcommand)]
        command: export::ExportCommand,
    },
    /// Show or write the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Date-range selection shared by reports, listings and exports.
///
/// `--from`/`--to` take precedence over `--period`.
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// today, week, month or all
    #[arg(long)]
    pub period: Option<String>,

    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,

    /// Last day, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    pub fn resolve(&self, service: &TillService, default: Period) -> AppResult<DateRange> {
        if self.from.is_some() || self.to.is_some() {
            return service.parse_range(self.from.as_deref(), self.to.as_deref());
        }

        let period = match &self.period {
            Some(raw) => raw.parse::<Period>()?,
            None => default,
        };
        Ok(service.period_range(period))
    }
}

// =============================================================================
// Output
// =============================================================================

/// Prints results as text or JSON.
#[derive(Debug, Clone)]
pub struct Output {
    pub json: bool,
    pub currency_symbol: String,
}

impl Output {
    pub fn new(json: bool, config: &TillConfig) -> Self {
        Output {
            json,
            currency_symbol: config.store.currency_symbol.clone(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    /// Prints `value` as JSON, or the text produced by `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> AppResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    /// Prints a failure to stderr, as JSON when requested.
    pub fn error(&self, err: &AppError) {
        if self.json {
            match serde_json::to_string_pretty(&err.to_response()) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("[{:?}] {}", err.code(), err),
            }
        } else {
            eprintln!("[{:?}] {}", err.code(), err);
        }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Runs a repository-backed command.
pub async fn dispatch(command: Command, service: &TillService, out: &Output) -> AppResult<()> {
    match command {
        Command::Menu { command } => menu::run(command, service, out).await,
        Command::Order { command } => order::run(command, service, out).await,
        Command::Report(args) => report::run(args, service, out).await,
        Command::Export { command } => export::run(command, service, out).await,
        Command::Config { command } => Err(AppError::config(format!(
            "config {:?} runs without a store",
            command
        ))),
    }
}

/// Runs `config show|init`.
pub fn run_config(
    command: ConfigCommand,
    config: &TillConfig,
    path: Option<PathBuf>,
    out: &Output,
) -> AppResult<()> {
    match command {
        ConfigCommand::Show => {
            let text = toml::to_string_pretty(config)?;
            out.emit(config, || text)
        }
        ConfigCommand::Init { force } => {
            let target = path
                .or_else(TillConfig::default_config_path)
                .ok_or_else(|| AppError::config("No config path available"))?;
            if target.exists() && !force {
                return Err(AppError::config(format!(
                    "{} already exists (use --force to overwrite)",
                    target.display()
                )));
            }
            let written = config.save(Some(target))?;
            out.emit(&serde_json::json!({ "path": written }), || {
                format!("Wrote {}", written.display())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_order_pay() {
        let cli = Cli::try_parse_from(["till", "--json", "order", "pay", "abc", "50.00"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Order {
                command: order::OrderCommand::Pay { ref order_id, amount: Some(ref amount) }
            } if order_id == "abc" && amount == "50.00"
        ));
    }

    #[test]
    fn test_parse_negative_quantity() {
        let cli = Cli::try_parse_from(["till", "order", "qty", "abc", "lomi", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Order {
                command: order::OrderCommand::Qty { ref quantity, .. }
            } if quantity == "-1"
        ));
    }

    #[test]
    fn test_parse_menu_avail() {
        let cli = Cli::try_parse_from(["till", "menu", "avail", "lomi", "off"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Menu {
                command: menu::MenuCommand::Avail { ref id, state: menu::Switch::Off }
            } if id == "lomi"
        ));
        assert!(Cli::try_parse_from(["till", "menu", "avail", "lomi", "maybe"]).is_err());
    }

    #[test]
    fn test_memory_flag_says_it_lasts_one_command() {
        let cli = Cli::try_parse_from(["till", "--memory", "menu", "list"]).unwrap();
        assert!(cli.memory);

        let command = Cli::command();
        let memory = command
            .get_arguments()
            .find(|arg| arg.get_id() == "memory")
            .unwrap();
        let help = memory.get_help().unwrap().to_string();
        assert!(help.contains("gone when the command exits"), "{}", help);
    }

    #[test]
    fn test_parse_report_range() {
        let cli =
            Cli::try_parse_from(["till", "report", "--from", "2026-03-01", "--to", "2026-03-31"])
                .unwrap();
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.range.from.as_deref(), Some("2026-03-01"));
                assert_eq!(args.range.to.as_deref(), Some("2026-03-31"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_show_and_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.toml");
        let config = TillConfig::default();
        let out = Output::new(true, &config);

        run_config(ConfigCommand::Show, &config, None, &out).unwrap();
        run_config(ConfigCommand::Init { force: false }, &config, Some(path.clone()), &out)
            .unwrap();
        assert!(path.exists());

        let err = run_config(ConfigCommand::Init { force: false }, &config, Some(path.clone()), &out)
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        run_config(ConfigCommand::Init { force: true }, &config, Some(path), &out).unwrap();
    }
}
