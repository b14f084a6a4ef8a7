//! # Repository Module
//!
//! Database repository implementations for Noodle Money Buddy.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TillService                                                           │
//! │       │                                                                 │
//! │       │  repo.save_order(&order)          (noodle_core::Repository)     │
//! │       ▼                                                                 │
//! │  Database ── impl Repository ──┬──► OrderRepository  (orders + lines)  │
//! │                                └──► MenuRepository   (menu_items)      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`] - Menu item upsert, lookup, availability
//! - [`OrderRepository`] - Order persistence with lines

pub mod menu;
pub mod order;

use async_trait::async_trait;
use noodle_core::{CoreResult, MenuItem, Order, Repository};

use crate::pool::Database;

pub use menu::MenuRepository;
pub use order::OrderRepository;

#[async_trait]
impl Repository for Database {
    async fn list_orders(&self) -> CoreResult<Vec<Order>> {
        Ok(self.orders().list().await?)
    }

    async fn get_order(&self, id: &str) -> CoreResult<Option<Order>> {
        Ok(self.orders().get_by_id(id).await?)
    }

    async fn save_order(&self, order: &Order) -> CoreResult<()> {
        Ok(self.orders().save(order).await?)
    }

    async fn delete_order(&self, id: &str) -> CoreResult<()> {
        Ok(self.orders().delete(id).await?)
    }

    async fn list_menu_items(&self) -> CoreResult<Vec<MenuItem>> {
        Ok(self.menu().list().await?)
    }

    async fn upsert_menu_item(&self, item: &MenuItem) -> CoreResult<()> {
        Ok(self.menu().upsert(item).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use noodle_core::{ErrorKind, Money, TaxRate};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_database_behind_trait_object() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.menu()
            .upsert(&MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles"))
            .await
            .unwrap();

        let repo: Arc<dyn Repository> = Arc::new(db.clone());
        let menu = repo.list_menu_items().await.unwrap();
        assert_eq!(menu.len(), 1);

        let mut order = Order::new(TaxRate::zero());
        order.add_item(&menu[0], 2).unwrap();
        repo.save_order(&order).await.unwrap();

        assert_eq!(repo.get_order(order.id()).await.unwrap(), Some(order.clone()));
        assert_eq!(repo.list_orders().await.unwrap().len(), 1);

        repo.delete_order(order.id()).await.unwrap();
        let err = repo.delete_order(order.id()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_closed_pool_is_a_persistence_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let repo: Arc<dyn Repository> = Arc::new(db);
        let err = repo.list_orders().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    }
}
