//! # Order Repository
//!
//! Database operations for orders and their lines.
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  orders                          order_lines                           │
//! │  ──────                          ───────────                           │
//! │  id ◄─────────────────────────── order_id  (ON DELETE CASCADE)        │
//! │  receipt_number                  position  (display order)            │
//! │  status                          menu_item_id, name_snapshot          │
//! │  tax_rate_bps                    unit_price_cents, quantity           │
//! │  payment_cents, change_cents                                           │
//! │  created_at, updated_at, paid_at                                       │
//! │                                                                         │
//! │  save()   = one transaction: upsert order row, replace all lines       │
//! │  delete() = delete order row, lines go with it                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, ORDER_ENTITY};
use noodle_core::{Money, Order, OrderLine, OrderRecord, OrderStatus, TaxRate};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    receipt_number: String,
    status: OrderStatus,
    tax_rate_bps: i64,
    payment_cents: i64,
    change_cents: i64,
    customer_name: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: String,
    order_id: String,
    menu_item_id: String,
    name_snapshot: String,
    unit_price_cents: i64,
    quantity: i64,
    added_at: DateTime<Utc>,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        OrderLine {
            id: row.id,
            menu_item_id: row.menu_item_id,
            name: row.name_snapshot,
            unit_price: Money::from_cents(row.unit_price_cents),
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

impl OrderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> DbResult<Order> {
        let bps = u32::try_from(self.tax_rate_bps).map_err(|_| {
            DbError::corrupt(
                "orders",
                format!("order {} has tax rate {}", self.id, self.tax_rate_bps),
            )
        })?;

        Ok(Order::restore(OrderRecord {
            id: self.id,
            receipt_number: self.receipt_number,
            status: self.status,
            lines,
            tax_rate: TaxRate::from_bps(bps),
            payment_amount: Money::from_cents(self.payment_cents),
            change_amount: Money::from_cents(self.change_cents),
            customer_name: self.customer_name,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            paid_at: self.paid_at,
        }))
    }
}

const ORDER_COLUMNS: &str = r#"
    id, receipt_number, status, tax_rate_bps, payment_cents, change_cents,
    customer_name, notes, created_at, updated_at, paid_at
"#;

const LINE_COLUMNS: &str = r#"
    id, order_id, menu_item_id, name_snapshot, unit_price_cents, quantity, added_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE id = ?1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines: Vec<OrderLineRow> = sqlx::query_as(&format!(
            "SELECT {} FROM order_lines WHERE order_id = ?1 ORDER BY position",
            LINE_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        row.into_order(lines.into_iter().map(OrderLine::from).collect())
            .map(Some)
    }

    /// All orders, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders ORDER BY created_at, rowid",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let lines: Vec<OrderLineRow> = sqlx::query_as(&format!(
            "SELECT {} FROM order_lines ORDER BY order_id, position",
            LINE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        assemble(rows, lines)
    }

    /// Orders created in `[from, until)`, oldest first.
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {} FROM orders WHERE created_at >= ?1 AND created_at < ?2 ORDER BY created_at, rowid",
            ORDER_COLUMNS
        ))
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        let lines: Vec<OrderLineRow> = sqlx::query_as(&format!(
            r#"
            SELECT {} FROM order_lines
            WHERE order_id IN (SELECT id FROM orders WHERE created_at >= ?1 AND created_at < ?2)
            ORDER BY order_id, position
            "#,
            LINE_COLUMNS
        ))
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        assemble(rows, lines)
    }

    /// Inserts or replaces an order and all of its lines in one transaction.
    pub async fn save(&self, order: &Order) -> DbResult<()> {
        debug!(
            order_id = %order.id(),
            status = %order.status(),
            lines = order.lines().len(),
            "Saving order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, receipt_number, status, tax_rate_bps, payment_cents, change_cents,
                customer_name, notes, created_at, updated_at, paid_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT (id) DO UPDATE SET
                receipt_number = excluded.receipt_number,
                status = excluded.status,
                tax_rate_bps = excluded.tax_rate_bps,
                payment_cents = excluded.payment_cents,
                change_cents = excluded.change_cents,
                customer_name = excluded.customer_name,
                notes = excluded.notes,
                updated_at = excluded.updated_at,
                paid_at = excluded.paid_at
            "#,
        )
        .bind(order.id())
        .bind(order.receipt_number())
        .bind(order.status())
        .bind(i64::from(order.tax_rate().bps()))
        .bind(order.payment_amount().cents())
        .bind(order.change_amount().cents())
        .bind(order.customer_name())
        .bind(order.notes())
        .bind(order.created_at())
        .bind(order.updated_at())
        .bind(order.paid_at())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
            .bind(order.id())
            .execute(&mut *tx)
            .await?;

        for (position, line) in order.lines().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (
                    id, order_id, position, menu_item_id, name_snapshot,
                    unit_price_cents, quantity, added_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&line.id)
            .bind(order.id())
            .bind(position as i64)
            .bind(&line.menu_item_id)
            .bind(&line.name)
            .bind(line.unit_price.cents())
            .bind(line.quantity)
            .bind(line.added_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Deletes an order and its lines.
    ///
    /// ## Errors
    /// `NotFound` if no order has this id.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ORDER_ENTITY, id));
        }

        debug!(order_id = %id, "Deleted order");
        Ok(())
    }
}

/// Attaches lines to their orders, preserving the order row sequence.
fn assemble(rows: Vec<OrderRow>, lines: Vec<OrderLineRow>) -> DbResult<Vec<Order>> {
    let mut by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        by_order
            .entry(line.order_id.clone())
            .or_default()
            .push(OrderLine::from(line));
    }

    rows.into_iter()
        .map(|row| {
            let lines = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(lines)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
