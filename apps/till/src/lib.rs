//! # noodle-till: Till Application Library
//!
//! Composition root for Noodle Money Buddy. Loads configuration, sets up
//! logging, opens the repository and hands it to [`TillService`].
//!
//! ## Module Organization
//! ```text
//! noodle_till/
//! ├── lib.rs          ◄─── You are here (startup wiring)
//! ├── config.rs       ◄─── TillConfig: defaults → TOML → NOODLE_* env
//! ├── error.rs        ◄─── AppError + ErrorCode (exit status)
//! ├── service.rs      ◄─── TillService: one method per use case
//! └── commands/
//!     ├── mod.rs      ◄─── clap Cli, range args, output
//!     ├── menu.rs     ◄─── menu list|add
//!     ├── order.rs    ◄─── order new|add|qty|remove|pay|...
//!     ├── report.rs   ◄─── report
//!     └── export.rs   ◄─── export orders|daily|top
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Till Startup                                      │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,noodle=debug,sqlx=warn; override with RUST_LOG      │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • --config path or platform config dir                              │
//! │                                                                         │
//! │  3. Open Repository ──────────────────────────────────────────────────► │
//! │     • SQLite (WAL, migrations) at database.path or the data dir         │
//! │     • --memory: MemoryRepository, nothing persisted                     │
//! │                                                                         │
//! │  4. Build TillService(Arc<dyn Repository>, &config) and dispatch        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod service;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use noodle_core::Repository;
use noodle_db::{demo_menu, Database, DbConfig, MemoryRepository};

pub use config::TillConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use service::{SalesReport, TenderResult, TillService};

const DEFAULT_LOG_FILTER: &str = "info,noodle=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=noodle_db=trace` - Trace one crate only
/// - Default: `info,noodle=debug,sqlx=warn`
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Opens the store the configuration points at.
///
/// `in_memory` swaps in a [`MemoryRepository`] holding the demo menu and no
/// orders. It lives only as long as the process, so every `till --memory`
/// command starts from that same state.
pub async fn open_repository(
    config: &TillConfig,
    in_memory: bool,
) -> AppResult<Arc<dyn Repository>> {
    if in_memory {
        info!("Using in-memory demo store; nothing outlives this command");
        return Ok(Arc::new(MemoryRepository::with_menu(demo_menu())));
    }

    let path = config.database_path()?;
    info!(?path, "Opening database");
    let db = Database::new(DbConfig::new(path)).await?;
    info!("Database connected and migrations applied");

    Ok(Arc::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_file_repository_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = TillConfig::default();
        config.database.path = Some(dir.path().join("till.db"));

        let repo = open_repository(&config, false).await.unwrap();
        assert!(repo.list_orders().await.unwrap().is_empty());
        assert!(dir.path().join("till.db").exists());
    }

    #[tokio::test]
    async fn test_memory_repository_starts_from_the_demo_menu() {
        let repo = open_repository(&TillConfig::default(), true).await.unwrap();
        assert_eq!(repo.list_menu_items().await.unwrap().len(), demo_menu().len());
        assert!(repo.list_orders().await.unwrap().is_empty());

        // A second open is a fresh store
        let mut order = noodle_core::Order::new(noodle_core::TaxRate::zero());
        order.add_item(&demo_menu()[0], 1).unwrap();
        repo.save_order(&order).await.unwrap();
        let again = open_repository(&TillConfig::default(), true).await.unwrap();
        assert!(again.list_orders().await.unwrap().is_empty());
    }
}
