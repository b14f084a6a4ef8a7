//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary, so a
//! till carries its own schema and upgrades its file when it opens it.
//!
//! ```text
//! 001_initial_schema.sql   menu_items, orders, order_lines
//! ```
//!
//! Applied files are recorded in `_sqlx_migrations`. A file that has shipped
//! is never edited; schema changes go in the next numbered file.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies whatever the store has not seen yet. Safe to call on every open.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    debug!(embedded = MIGRATOR.migrations.len(), "Migrations applied");
    Ok(())
}
