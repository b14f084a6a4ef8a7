//! # Store Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sqlx::Error / MigrateError                                             │
//! │       │  From                                                           │
//! │       ▼                                                                 │
//! │  DbError                                                                │
//! │       │  From                                                           │
//! │       ▼                                                                 │
//! │  CoreError::OrderNotFound | MenuItemNotFound     (a missing row)        │
//! │  CoreError::Persistence(message)                 (anything else)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core never looks inside a persistence failure. The message is kept
//! only so the operator can read it.

use std::fmt;

use noodle_core::CoreError;
use thiserror::Error;

/// Entity names carried by [`DbError::NotFound`].
pub const ORDER_ENTITY: &str = "Order";
pub const MENU_ITEM_ENTITY: &str = "Menu item";

/// Which SQLite constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    NotNull,
}

impl ConstraintKind {
    /// Recognises SQLite's `"<KIND> constraint failed: <detail>"` messages.
    fn from_message(message: &str) -> Option<Self> {
        [
            ("UNIQUE", ConstraintKind::Unique),
            ("FOREIGN KEY", ConstraintKind::ForeignKey),
            ("CHECK", ConstraintKind::Check),
            ("NOT NULL", ConstraintKind::NotNull),
        ]
        .into_iter()
        .find(|(prefix, _)| message.starts_with(&format!("{} constraint failed", prefix)))
        .map(|(_, kind)| kind)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
            ConstraintKind::Check => write!(f, "check"),
            ConstraintKind::NotNull => write!(f, "not null"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A write broke a schema rule, e.g. a line with quantity 0.
    #[error("{kind} constraint failed: {detail}")]
    Constraint { kind: ConstraintKind, detail: String },

    /// The file could not be opened or the pool is closed.
    #[error("Cannot open store: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be turned back into a domain value.
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: String, reason: String },

    /// Another writer held the file for longer than the busy timeout.
    #[error("Store is busy")]
    Busy,

    #[error("Query failed: {0}")]
    Query(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(table: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::CorruptRow {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Queries here use fetch_optional; a bare RowNotFound has no id to report
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                match ConstraintKind::from_message(message) {
                    Some(kind) => DbError::Constraint {
                        kind,
                        detail: message
                            .split_once(": ")
                            .map(|(_, detail)| detail)
                            .unwrap_or(message)
                            .to_string(),
                    },
                    None if message.contains("database is locked") => DbError::Busy,
                    None => DbError::Query(message.to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// A missing order or menu item stays NotFound; everything else is an
/// opaque persistence failure.
impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } if entity == ORDER_ENTITY => {
                CoreError::OrderNotFound(id)
            }
            DbError::NotFound { entity, id } if entity == MENU_ITEM_ENTITY => {
                CoreError::MenuItemNotFound(id)
            }
            other => CoreError::Persistence(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
