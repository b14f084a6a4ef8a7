//! # Menu Repository
//!
//! Database operations for menu items.
//!
//! Items are listed in the order they were first inserted; an upsert keeps
//! the original position so the menu board does not reshuffle on a price
//! change.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use noodle_core::{MenuItem, Money};

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    price_cents: i64,
    category: String,
    is_available: bool,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            price: Money::from_cents(row.price_cents),
            category: row.category,
            is_available: row.is_available,
        }
    }
}

/// Repository for menu item database operations.
#[derive(Debug, Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    /// Creates a new MenuRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuRepository { pool }
    }

    /// All items in menu order.
    pub async fn list(&self) -> DbResult<Vec<MenuItem>> {
        let rows: Vec<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_cents, category, is_available
            FROM menu_items
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    /// Gets a menu item by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, price_cents, category, is_available
            FROM menu_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MenuItem::from))
    }

    /// Inserts a menu item or replaces the one with the same id.
    pub async fn upsert(&self, item: &MenuItem) -> DbResult<()> {
        let now: DateTime<Utc> = Utc::now();
        debug!(id = %item.id, price = %item.price, "Upserting menu item");

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, price_cents, category, is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                price_cents = excluded.price_cents,
                category = excluded.category,
                is_available = excluded.is_available,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(item.price.cents())
        .bind(&item.category)
        .bind(item.is_available)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of menu items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
