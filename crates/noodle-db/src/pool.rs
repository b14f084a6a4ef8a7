//! # Store Handle
//!
//! Opens the till's SQLite file and hands out the per-table repositories.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_repository()  (apps/till)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new("…/noodle.db")      DbConfig::in_memory()   (tests)      │
//! │       │                                   │                             │
//! │       └──────────────┬────────────────────┘                             │
//! │                      ▼                                                  │
//! │  Database::new ── pragmas ── SqlitePool ── migrations/sqlite            │
//! │                      │                                                  │
//! │          ┌───────────┴───────────┐                                      │
//! │          ▼                       ▼                                      │
//! │   MenuRepository          OrderRepository                               │
//! │   (menu_items)            (orders + order_lines)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pragmas
//! `journal_mode=WAL` lets a report read while the counter saves an order.
//! `foreign_keys=ON` makes deleting an order take its lines with it.
//! `busy_timeout` covers the seed binary and the till touching one file.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::menu::MenuRepository;
use crate::repository::order::OrderRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives and how the pool behaves.
///
/// ```rust,ignore
/// let config = DbConfig::new(data_dir.join("noodle.db")).max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,
    /// One till rarely needs more than a couple.
    pub max_connections: u32,
    /// How long a write waits on a locked file before failing.
    pub busy_timeout: Duration,
    /// Apply pending migrations when opening.
    pub run_migrations: bool,
}

impl DbConfig {
    /// A file-backed store; the file is created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// A throwaway store for tests.
    ///
    /// Every SQLite `:memory:` connection is a separate database, so the
    /// pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let url = if self.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}", self.database_path.display())
        };

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout)
            .create_if_missing(true);

        Ok(options)
    }
}

// =============================================================================
// Database
// =============================================================================

/// The SQLite store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (and if needed creates) the store, then migrates it.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = config.connect_options()?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            path = %config.database_path.display(),
            max_connections = config.max_connections,
            "Store opened"
        );

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }
        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;
        debug!("Schema up to date");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Closes the pool. Later repository calls fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Store closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_is_fully_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(applied, 1);
        assert_eq!(db.menu().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_store_created_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noodle.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(path.exists());

        db.close().await;
        let err: noodle_core::CoreError = db.orders().list().await.unwrap_err().into();
        assert_eq!(err.kind(), noodle_core::ErrorKind::PersistenceFailure);
    }

    #[test]
    fn test_in_memory_pins_one_connection() {
        let config = DbConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);

        let config = DbConfig::new("till.db")
            .max_connections(2)
            .busy_timeout(Duration::from_millis(250))
            .run_migrations(false);
        assert!(!config.is_in_memory());
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.run_migrations);
    }
}
