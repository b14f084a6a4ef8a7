//! # Repository Contract
//!
//! The boundary between the domain and whatever stores orders and menu items.
//!
//! ```text
//! ┌──────────────────────┐        Arc<dyn Repository>        ┌──────────────────────┐
//! │  TillService (app)   │ ─────────────────────────────────►│  noodle-db::Database │
//! │  uses Order,         │                                   │  noodle-db::Memory.. │
//! │  PaymentProcessor,   │ ◄───────── CoreResult<T> ──────── │  (any other store)   │
//! │  StatisticsAggregator│                                   └──────────────────────┘
//! └──────────────────────┘
//! ```
//!
//! ## Contract
//! - Each call is one atomic request/response
//! - Last write wins per order id; callers serialize edits to one order
//! - Failures come back as [`CoreError::Persistence`](crate::CoreError::Persistence)
//!   and are never retried here
//! - `delete_order` on an unknown id fails with `OrderNotFound`

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::order::Order;
use crate::types::MenuItem;

#[async_trait]
pub trait Repository: Send + Sync {
    /// All orders, oldest first.
    async fn list_orders(&self) -> CoreResult<Vec<Order>>;

    /// One order with its lines, or `None`.
    async fn get_order(&self, id: &str) -> CoreResult<Option<Order>>;

    /// Inserts or replaces the order and all of its lines.
    async fn save_order(&self, order: &Order) -> CoreResult<()>;

    async fn delete_order(&self, id: &str) -> CoreResult<()>;

    /// The full menu, including unavailable items.
    async fn list_menu_items(&self) -> CoreResult<Vec<MenuItem>>;

    /// Inserts a menu item or replaces the one with the same id.
    async fn upsert_menu_item(&self, item: &MenuItem) -> CoreResult<()>;
}
