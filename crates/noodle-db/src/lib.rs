//! # noodle-db: Database Layer for Noodle Money Buddy
//!
//! Persistence for menus and orders: SQLite through sqlx for the real till,
//! and a volatile in-memory store for tests and demos. Both implement
//! [`noodle_core::Repository`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Noodle Money Buddy Data Flow                         │
//! │                                                                         │
//! │  TillService (apps/till)                                               │
//! │       │  Arc<dyn Repository>                                           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     noodle-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ MenuRepo      │    │  (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ OrderRepo     │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────────────────────┐                             │   │
//! │  │   │ MemoryRepository (memory.rs)  │  tests, --memory demo runs  │   │
//! │  │   └───────────────────────────────┘                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir)/noodle.db                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use noodle_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("noodle.db")).await?;
//! db.menu().upsert(&item).await?;
//! let orders = db.orders().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod demo;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use demo::demo_menu;
pub use error::{DbError, DbResult};
pub use memory::MemoryRepository;
pub use pool::{Database, DbConfig};
pub use repository::{MenuRepository, OrderRepository};
