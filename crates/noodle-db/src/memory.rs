//! # In-Memory Repository
//!
//! A [`Repository`] backed by plain vectors behind a `tokio::sync::RwLock`.
//!
//! Used by the till's integration tests and by `till --memory` demo runs.
//! Orders are cloned in and out, so callers never share mutable state with
//! the store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use noodle_core::{CoreError, CoreResult, MenuItem, Order, Repository};

#[derive(Debug, Default)]
struct MemoryState {
    orders: Vec<Order>,
    menu: Vec<MenuItem>,
}

/// Volatile store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RwLock<MemoryState>,
    offline: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with a menu.
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        MemoryRepository {
            state: RwLock::new(MemoryState {
                orders: Vec::new(),
                menu,
            }),
            offline: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail with a persistence error.
    ///
    /// Lets tests observe how callers surface storage failures.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> CoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_orders(&self) -> CoreResult<Vec<Order>> {
        self.check_online()?;
        let mut orders = self.state.read().await.orders.clone();
        orders.sort_by_key(|o| o.created_at());
        Ok(orders)
    }

    async fn get_order(&self, id: &str) -> CoreResult<Option<Order>> {
        self.check_online()?;
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| o.id() == id).cloned())
    }

    async fn save_order(&self, order: &Order) -> CoreResult<()> {
        self.check_online()?;
        let mut state = self.state.write().await;
        match state.orders.iter_mut().find(|o| o.id() == order.id()) {
            Some(existing) => *existing = order.clone(),
            None => state.orders.push(order.clone()),
        }
        debug!(order_id = %order.id(), status = %order.status(), "Saved order in memory");
        Ok(())
    }

    async fn delete_order(&self, id: &str) -> CoreResult<()> {
        self.check_online()?;
        let mut state = self.state.write().await;
        let before = state.orders.len();
        state.orders.retain(|o| o.id() != id);
        if state.orders.len() == before {
            return Err(CoreError::OrderNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_menu_items(&self) -> CoreResult<Vec<MenuItem>> {
        self.check_online()?;
        Ok(self.state.read().await.menu.clone())
    }

    /// Replaces in place, so menu order stays insertion order.
    async fn upsert_menu_item(&self, item: &MenuItem) -> CoreResult<()> {
        self.check_online()?;
        let mut state = self.state.write().await;
        match state.menu.iter_mut().find(|m| m.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => state.menu.push(item.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use noodle_core::{ErrorKind, Money, TaxRate};

    fn lomi() -> MenuItem {
        MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles")
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let repo = MemoryRepository::with_menu(vec![lomi()]);
        let mut order = Order::new(TaxRate::zero());
        order.add_item(&lomi(), 1).unwrap();
        repo.save_order(&order).await.unwrap();

        order.add_item(&lomi(), 2).unwrap();
        repo.save_order(&order).await.unwrap();

        let stored = repo.get_order(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.lines()[0].quantity, 3);
        assert_eq!(repo.list_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_oldest_first() {
        let repo = MemoryRepository::new();
        let later = Order::new_at(TaxRate::zero(), Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap());
        let earlier = Order::new_at(TaxRate::zero(), Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
        repo.save_order(&later).await.unwrap();
        repo.save_order(&earlier).await.unwrap();

        let orders = repo.list_orders().await.unwrap();
        assert_eq!(orders[0].id(), earlier.id());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = MemoryRepository::new();
        let err = repo.delete_order("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_upsert_menu_item_in_place() {
        let repo = MemoryRepository::with_menu(vec![lomi()]);
        repo.upsert_menu_item(&MenuItem::new("tea", "Iced Tea", Money::from_cents(1500), "Drinks"))
            .await
            .unwrap();
        repo.upsert_menu_item(&lomi().with_availability(false)).await.unwrap();

        let menu = repo.list_menu_items().await.unwrap();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].id, "lomi");
        assert!(!menu[0].is_available);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let repo = MemoryRepository::new();
        repo.set_offline(true);

        let err = repo.list_menu_items().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);

        repo.set_offline(false);
        assert!(repo.list_menu_items().await.is_ok());
    }
}
