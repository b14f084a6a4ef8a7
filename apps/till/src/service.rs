//! # Till Service
//!
//! The use-case layer: every command the till offers is one method here.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  till order pay <id> 100                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TillService::tender                                                    │
//! │       │  1. Money::parse("100")                                         │
//! │       │  2. repo.get_order(id)                    (Repository)          │
//! │       │  3. PaymentProcessor::initiate, then apply (validates once)     │
//! │       │  4. repo.save_order(&order)               (last write wins)     │
//! │       ▼                                                                 │
//! │  TenderResult { outcome, warnings, order }                              │
//! │                                                                         │
//! │  till report --period week                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  repo.list_orders() ──► StatisticsAggregator::summarize ──► SalesReport │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call loads the order fresh, mutates the snapshot and saves it back.
//! Nothing is cached between calls, so two tills editing one order race and
//! the last save wins.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use noodle_core::export::{daily_sales_to_csv, orders_to_csv, top_items_to_csv};
use noodle_core::validation::parse_quantity;
use noodle_core::{
    CoreError, DateRange, MenuCatalog, MenuItem, Money, Order, OrderStatus, PaymentOutcome,
    PaymentProcessor, PaymentSession, Period, Repository, SalesStatistics, StatisticsAggregator,
    StatusCounts, TaxRate,
};

use crate::config::TillConfig;
use crate::error::AppResult;

// =============================================================================
// Response Types
// =============================================================================

/// Result of one tender.
#[derive(Debug, Clone, Serialize)]
pub struct TenderResult {
    pub outcome: PaymentOutcome,
    /// Soft warnings, e.g. an unusually large tender.
    pub warnings: Vec<String>,
    pub order: Order,
}

/// Everything `till report` shows.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub store_name: String,
    pub statistics: SalesStatistics,
    pub status_counts: StatusCounts,
}

// =============================================================================
// Service
// =============================================================================

/// Use cases over an injected repository.
pub struct TillService {
    repo: Arc<dyn Repository>,
    tax_rate: TaxRate,
    store_name: String,
    strict_dates: bool,
    payments: PaymentProcessor,
    stats: StatisticsAggregator,
}

impl TillService {
    pub fn new(repo: Arc<dyn Repository>, config: &TillConfig) -> Self {
        TillService {
            repo,
            tax_rate: config.tax_rate(),
            store_name: config.store.name.clone(),
            strict_dates: config.statistics.strict_dates,
            payments: config.payment_processor(),
            stats: config.statistics_aggregator(),
        }
    }

    pub fn statistics(&self) -> &StatisticsAggregator {
        &self.stats
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Loads the menu as a validated catalog.
    pub async fn menu(&self) -> AppResult<MenuCatalog> {
        let items = self.repo.list_menu_items().await?;
        Ok(MenuCatalog::new(items).map_err(CoreError::from)?)
    }

    /// Adds a menu item, or replaces the one with the same id.
    pub async fn upsert_menu_item(&self, item: MenuItem) -> AppResult<MenuItem> {
        item.validate().map_err(CoreError::from)?;
        self.repo.upsert_menu_item(&item).await?;
        info!(id = %item.id, price = %item.price, available = item.is_available, "Menu item saved");
        Ok(item)
    }

    /// Marks a menu item sold out or back on. Lines already ordered keep
    /// their price and stay payable.
    pub async fn set_availability(&self, id: &str, is_available: bool) -> AppResult<MenuItem> {
        let catalog = self.menu().await?;
        let item = catalog.require(id)?.clone().with_availability(is_available);
        self.repo.upsert_menu_item(&item).await?;
        info!(id, available = is_available, "Menu availability changed");
        Ok(item)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Starts a new Pending order at the configured tax rate.
    pub async fn open_order(
        &self,
        customer_name: Option<&str>,
        notes: Option<&str>,
    ) -> AppResult<Order> {
        let mut order = Order::new(self.tax_rate);
        order.set_customer_name(customer_name)?;
        order.set_notes(notes)?;

        self.repo.save_order(&order).await?;
        info!(order_id = %order.id(), receipt = %order.receipt_number(), "Order opened");
        Ok(order)
    }

    /// Fetches an order or fails with `OrderNotFound`.
    pub async fn order(&self, order_id: &str) -> AppResult<Order> {
        self.repo
            .get_order(order_id)
            .await?
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()).into())
    }

    /// Orders of every status created within the range, oldest first.
    pub async fn list_orders(&self, range: &DateRange) -> AppResult<Vec<Order>> {
        let orders = self.repo.list_orders().await?;
        Ok(self.stats.orders_in_range(orders, range))
    }

    /// Adds a menu item to an order by catalog id.
    ///
    /// ## Errors
    /// - `MenuItemNotFound` for an id not on the menu
    /// - `MenuItemUnavailable` when the kitchen has switched the item off
    /// - Order errors from [`Order::add_item`]
    pub async fn add_item(
        &self,
        order_id: &str,
        menu_item_id: &str,
        quantity: i64,
    ) -> AppResult<Order> {
        let mut order = self.order(order_id).await?;
        let catalog = self.menu().await?;
        let item = catalog.require(menu_item_id)?;

        if !item.is_available {
            return Err(CoreError::MenuItemUnavailable {
                id: item.id.clone(),
                name: item.name.clone(),
            }
            .into());
        }

        order.add_item(item, quantity)?;
        self.repo.save_order(&order).await?;
        Ok(order)
    }

    /// Sets a line's quantity from what was typed. Zero or less removes it.
    ///
    /// `line` may be a line id or the menu item id of a line on the order.
    pub async fn set_quantity(&self, order_id: &str, line: &str, raw: &str) -> AppResult<Order> {
        let quantity = parse_quantity(raw).map_err(CoreError::from)?;

        let mut order = self.order(order_id).await?;
        let line_id = resolve_line(&order, line);
        order.update_quantity(&line_id, quantity)?;

        self.repo.save_order(&order).await?;
        Ok(order)
    }

    /// Removes a line; an unknown line leaves the order as it was.
    pub async fn remove_line(&self, order_id: &str, line: &str) -> AppResult<Order> {
        let mut order = self.order(order_id).await?;
        let line_id = resolve_line(&order, line);

        if order.remove_item(&line_id)?.is_none() {
            debug!(order_id, line, "No such line, nothing removed");
        }

        self.repo.save_order(&order).await?;
        Ok(order)
    }

    /// Opens a payment session without tendering anything.
    pub async fn begin_payment(&self, order_id: &str) -> AppResult<PaymentSession> {
        let order = self.repo.get_order(order_id).await?;
        Ok(self.payments.initiate(order_id, order.as_ref())?)
    }

    /// Tenders cash against an order.
    ///
    /// The amount is validated before the order is touched; a rejected
    /// tender leaves the stored order unchanged.
    pub async fn tender(&self, order_id: &str, raw_amount: &str) -> AppResult<TenderResult> {
        let amount = Money::parse(raw_amount).map_err(|e| CoreError::InvalidPaymentAmount {
            reason: e.to_string(),
        })?;

        let mut order = self.order(order_id).await?;
        self.payments.initiate(order_id, Some(&order))?;

        let applied = self.payments.apply(&mut order, amount)?;
        self.repo.save_order(&order).await?;

        debug!(
            order_id,
            tendered = %amount,
            complete = applied.outcome.is_complete(),
            "Tender saved"
        );

        Ok(TenderResult {
            outcome: applied.outcome,
            warnings: applied.warnings,
            order,
        })
    }

    pub async fn cancel(&self, order_id: &str) -> AppResult<Order> {
        let mut order = self.order(order_id).await?;
        order.cancel()?;
        self.repo.save_order(&order).await?;
        Ok(order)
    }

    pub async fn refund(&self, order_id: &str) -> AppResult<Order> {
        let mut order = self.order(order_id).await?;
        order.refund()?;
        self.repo.save_order(&order).await?;
        Ok(order)
    }

    /// Deletes an order that never took money.
    ///
    /// Paid and refunded orders are sales history and cannot be discarded.
    pub async fn discard(&self, order_id: &str) -> AppResult<()> {
        let order = self.order(order_id).await?;
        if matches!(order.status(), OrderStatus::Paid | OrderStatus::Refunded) {
            return Err(CoreError::invalid_state(order_id, order.status(), "discard").into());
        }

        self.repo.delete_order(order_id).await?;
        info!(order_id, "Order discarded");
        Ok(())
    }

    // =========================================================================
    // Reports & Export
    // =========================================================================

    /// Resolves a named period against the shop's current day.
    pub fn period_range(&self, period: Period) -> DateRange {
        self.stats.resolve(period, Utc::now())
    }

    /// Parses `--from`/`--to`, strictly or leniently per configuration.
    pub fn parse_range(&self, from: Option<&str>, to: Option<&str>) -> AppResult<DateRange> {
        if self.strict_dates {
            Ok(DateRange::parse(from, to)?)
        } else {
            Ok(DateRange::parse_lenient(from, to))
        }
    }

    pub async fn report(&self, range: &DateRange) -> AppResult<SalesReport> {
        let orders = self.repo.list_orders().await?;
        debug!(orders = orders.len(), range = %range.label(), "Building sales report");

        Ok(SalesReport {
            store_name: self.store_name.clone(),
            statistics: self.stats.summarize(&orders, range),
            status_counts: self.stats.status_counts(&orders, range),
        })
    }

    pub async fn export_orders(&self, range: &DateRange) -> AppResult<String> {
        let orders = self.list_orders(range).await?;
        Ok(orders_to_csv(&orders, self.stats.offset()))
    }

    pub async fn export_daily_sales(&self, range: &DateRange) -> AppResult<String> {
        let orders = self.repo.list_orders().await?;
        Ok(daily_sales_to_csv(&self.stats.daily_sales(&orders, range)))
    }

    /// Best sellers as CSV; `limit` defaults to the configured top-N.
    pub async fn export_top_items(
        &self,
        range: &DateRange,
        limit: Option<usize>,
    ) -> AppResult<String> {
        let orders = self.repo.list_orders().await?;
        let limit = limit.unwrap_or_else(|| self.stats.top_limit());
        Ok(top_items_to_csv(
            &self.stats.top_selling_items(&orders, range, limit),
        ))
    }
}

/// Accepts either a line id or the menu item id of a line on the order.
fn resolve_line(order: &Order, reference: &str) -> String {
    if order.line(reference).is_some() {
        return reference.to_string();
    }
    order
        .line_for_item(reference)
        .map(|line| line.id.clone())
        .unwrap_or_else(|| reference.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodle_db::MemoryRepository;

    fn service() -> TillService {
        let repo = MemoryRepository::with_menu(vec![MenuItem::new(
            "lomi",
            "Lomi",
            Money::from_cents(3000),
            "Noodles",
        )]);
        TillService::new(Arc::new(repo), &TillConfig::default())
    }

    #[tokio::test]
    async fn test_resolve_line_by_menu_item_id() {
        let till = service();
        let order = till.open_order(None, None).await.unwrap();
        let order = till.add_item(order.id(), "lomi", 2).await.unwrap();
        let line_id = order.lines()[0].id.clone();

        assert_eq!(resolve_line(&order, "lomi"), line_id);
        assert_eq!(resolve_line(&order, &line_id), line_id);
        assert_eq!(resolve_line(&order, "nope"), "nope");
    }

    #[tokio::test]
    async fn test_strictness_follows_config() {
        let lenient = service();
        let range = lenient.parse_range(Some("yesterday-ish"), None).unwrap();
        assert_eq!(range, DateRange::all());

        let mut config = TillConfig::default();
        config.statistics.strict_dates = true;
        let strict = TillService::new(Arc::new(MemoryRepository::new()), &config);
        assert!(strict.parse_range(Some("yesterday-ish"), None).is_err());
    }
}
