//! # Order
//!
//! A single customer transaction: line items, derived totals and payment state.
//!
//! ## Order Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Order Operations (Pending only)                      │
//! │                                                                         │
//! │  Counter Action           Method                  State Change          │
//! │  ──────────────           ──────                  ────────────          │
//! │                                                                         │
//! │  Tap menu item ─────────► add_item() ───────────► merge or push line   │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ────► qty = n (≤0 removes) │
//! │                                                                         │
//! │  Swipe line away ───────► remove_item() ────────► lines.retain(..)     │
//! │                                                                         │
//! │  Take cash ─────────────► process_payment() ────► payment += amount,   │
//! │                                                   Paid when ≥ total    │
//! │                                                                         │
//! │  Void order ────────────► cancel() ─────────────► Cancelled, no lines  │
//! │                                                                         │
//! │  Paid / Cancelled / Refunded orders reject every call above except     │
//! │  a repeated cancel() on an already cancelled order.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use noodle_core::{MenuItem, Money, Order, PaymentOutcome, TaxRate};
//!
//! let canton = MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles");
//! let lomi = MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles");
//!
//! let mut order = Order::new(TaxRate::zero());
//! order.add_item(&canton, 2).unwrap();
//! order.add_item(&lomi, 1).unwrap();
//! assert_eq!(order.subtotal(), Money::from_cents(8000));
//!
//! let outcome = order.process_payment(Money::from_cents(10000)).unwrap();
//! assert_eq!(outcome, PaymentOutcome::Success { change: Money::from_cents(2000) });
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::payment::PaymentOutcome;
use crate::types::{MenuItem, OrderStatus, TaxRate};
use crate::validation::{
    validate_customer_name, validate_order_size, validate_payment_amount, validate_price,
    validate_quantity,
};
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

// =============================================================================
// Order Line
// =============================================================================

/// One menu item at a captured price and quantity within an order.
///
/// ## Snapshot Pattern
/// `name` and `unit_price` are copied from the menu item when the line is
/// created. A later price change on the menu never alters this line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    /// Line identifier (UUID v4).
    pub id: String,

    /// Weak reference to the menu item this line was created from.
    pub menu_item_id: String,

    /// Item name at time of adding (frozen).
    pub name: String,

    /// Price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity ordered, always > 0 while the line exists.
    pub quantity: i64,

    /// When this line was first added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl OrderLine {
    /// Creates a new line from a menu item and quantity.
    pub fn from_menu_item(item: &MenuItem, quantity: i64) -> Self {
        OrderLine {
            id: Uuid::new_v4().to_string(),
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// A line is valid when both quantity and unit price are positive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.quantity > 0 && self.unit_price.is_positive()
    }
}

// =============================================================================
// Order Record
// =============================================================================

/// The persisted shape of an [`Order`].
///
/// Repositories read and write this struct; [`Order::restore`] turns it back
/// into an order without re-running any business rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub receipt_number: String,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub tax_rate: TaxRate,
    pub payment_amount: Money,
    pub change_amount: Money,
    pub customer_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Order
// =============================================================================

/// A customer transaction.
///
/// ## Invariants
/// - Lines are unique by `menu_item_id` (adding the same item merges)
/// - Every line has quantity in `1..=MAX_LINE_QUANTITY`
/// - `payment_amount` never decreases
/// - `status` only moves forward: Pending → {Paid, Cancelled}, Paid → Refunded
/// - Once terminal, lines and payment are frozen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    id: String,
    receipt_number: String,
    status: OrderStatus,
    lines: Vec<OrderLine>,
    tax_rate: TaxRate,
    payment_amount: Money,
    change_amount: Money,
    customer_name: Option<String>,
    notes: Option<String>,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    #[ts(as = "String")]
    updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a new, empty, pending order stamped with the current time.
    pub fn new(tax_rate: TaxRate) -> Self {
        Self::new_at(tax_rate, Utc::now())
    }

    /// Creates a new pending order with an explicit creation time.
    ///
    /// Used when importing historical orders and in statistics tests.
    pub fn new_at(tax_rate: TaxRate, created_at: DateTime<Utc>) -> Self {
        let id = Uuid::new_v4();
        let receipt_number = generate_receipt_number(created_at, &id);

        Order {
            id: id.to_string(),
            receipt_number,
            status: OrderStatus::Pending,
            lines: Vec::new(),
            tax_rate,
            payment_amount: Money::zero(),
            change_amount: Money::zero(),
            customer_name: None,
            notes: None,
            created_at,
            updated_at: created_at,
            paid_at: None,
        }
    }

    /// Rebuilds an order from its persisted record.
    pub fn restore(record: OrderRecord) -> Self {
        Order {
            id: record.id,
            receipt_number: record.receipt_number,
            status: record.status,
            lines: record.lines,
            tax_rate: record.tax_rate,
            payment_amount: record.payment_amount,
            change_amount: record.change_amount,
            customer_name: record.customer_name,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
            paid_at: record.paid_at,
        }
    }

    /// Returns the persisted shape of this order.
    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id.clone(),
            receipt_number: self.receipt_number.clone(),
            status: self.status,
            lines: self.lines.clone(),
            tax_rate: self.tax_rate,
            payment_amount: self.payment_amount,
            change_amount: self.change_amount,
            customer_name: self.customer_name.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            paid_at: self.paid_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Cumulative amount tendered so far.
    pub fn payment_amount(&self) -> Money {
        self.payment_amount
    }

    /// Change handed back; zero until the order is paid.
    pub fn change_amount(&self) -> Money {
        self.change_amount
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    /// Finds a line by its id.
    pub fn line(&self, line_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Finds the line created from a given menu item.
    pub fn line_for_item(&self, menu_item_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.menu_item_id == menu_item_id)
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    /// Σ line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(OrderLine::line_total).sum()
    }

    /// Tax on the subtotal at the order's rate.
    pub fn tax(&self) -> Money {
        self.subtotal().calculate_tax(self.tax_rate)
    }

    /// Subtotal plus tax.
    pub fn total(&self) -> Money {
        self.subtotal() + self.tax()
    }

    /// Amount still owed, never negative.
    pub fn remaining(&self) -> Money {
        self.total().saturating_diff(self.payment_amount)
    }

    /// True once cumulative payment covers the total.
    pub fn is_fully_paid(&self) -> bool {
        self.payment_amount >= self.total()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Σ line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// At least one line, every line valid, and a positive total.
    pub fn is_valid(&self) -> bool {
        !self.lines.is_empty()
            && self.lines.iter().all(OrderLine::is_valid)
            && self.total().is_positive()
    }

    // =========================================================================
    // Details
    // =========================================================================

    /// Sets or clears the customer name shown on the order ticket.
    pub fn set_customer_name(&mut self, name: Option<&str>) -> CoreResult<()> {
        self.ensure_pending("change the customer name")?;
        self.customer_name = validate_customer_name(name)?;
        self.touch();
        Ok(())
    }

    /// Sets or clears the kitchen notes.
    pub fn set_notes(&mut self, notes: Option<&str>) -> CoreResult<()> {
        self.ensure_pending("change the notes")?;
        self.notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Line Mutation
    // =========================================================================

    /// Adds a menu item or increases the quantity of its existing line.
    ///
    /// ## Behavior
    /// - Line for this menu item exists: quantity += `quantity`, the original
    ///   price snapshot is kept
    /// - Otherwise: a new line is appended with the current menu price
    ///
    /// ## Errors
    /// - `InvalidOrderState` if the order is not pending
    /// - `Validation` if `quantity` is not in `1..=999` or a new line's menu
    ///   price is not a sellable price
    /// - `QuantityTooLarge` if the merged quantity would exceed 999
    /// - `OrderTooLarge` if a new line would exceed 100 lines
    pub fn add_item(&mut self, item: &MenuItem, quantity: i64) -> CoreResult<&OrderLine> {
        self.ensure_pending("add items")?;
        validate_quantity(quantity)?;

        if let Some(index) = self.lines.iter().position(|l| l.menu_item_id == item.id) {
            let merged = self.lines[index].quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_LINE_QUANTITY,
                });
            }
            self.lines[index].quantity = merged;
            self.touch();
            debug!(order_id = %self.id, menu_item_id = %item.id, quantity = merged, "Merged order line");
            return Ok(&self.lines[index]);
        }

        validate_order_size(self.lines.len()).map_err(|_| CoreError::OrderTooLarge {
            max: MAX_ORDER_LINES,
        })?;

        validate_price(item.price)?;
        self.lines.push(OrderLine::from_menu_item(item, quantity));
        self.touch();
        debug!(order_id = %self.id, menu_item_id = %item.id, quantity, "Added order line");

        let last = self.lines.len() - 1;
        Ok(&self.lines[last])
    }

    /// Removes a line. Unknown ids are not an error.
    ///
    /// Returns the removed line, if any.
    pub fn remove_item(&mut self, line_id: &str) -> CoreResult<Option<OrderLine>> {
        self.ensure_pending("remove items")?;

        let Some(index) = self.lines.iter().position(|l| l.id == line_id) else {
            return Ok(None);
        };

        let removed = self.lines.remove(index);
        self.touch();
        debug!(order_id = %self.id, line_id, "Removed order line");
        Ok(Some(removed))
    }

    /// Sets a line's quantity; zero or negative removes the line.
    ///
    /// Unknown line ids are a no-op whatever the quantity.
    pub fn update_quantity(&mut self, line_id: &str, new_quantity: i64) -> CoreResult<()> {
        self.ensure_pending("change quantities")?;

        let Some(index) = self.lines.iter().position(|l| l.id == line_id) else {
            debug!(order_id = %self.id, line_id, "No such line, quantity unchanged");
            return Ok(());
        };

        if new_quantity <= 0 {
            self.remove_item(line_id)?;
            return Ok(());
        }

        if new_quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.lines[index].quantity = new_quantity;
        self.touch();
        Ok(())
    }

    // =========================================================================
    // State Transitions
    // =========================================================================

    /// Cancels the order and clears its lines.
    ///
    /// Cancelling an already cancelled order is a no-op. Paid and refunded
    /// orders cannot be cancelled.
    pub fn cancel(&mut self) -> CoreResult<()> {
        match self.status {
            OrderStatus::Cancelled => Ok(()),
            OrderStatus::Pending => {
                self.status = OrderStatus::Cancelled;
                self.lines.clear();
                self.touch();
                info!(order_id = %self.id, "Order cancelled");
                Ok(())
            }
            OrderStatus::Paid | OrderStatus::Refunded => {
                Err(CoreError::invalid_state(&self.id, self.status, "cancel"))
            }
        }
    }

    /// Records one cash tender.
    ///
    /// Each call is a separate real-world payment; calls accumulate until the
    /// total is covered.
    ///
    /// ## Returns
    /// - `Success { change }` when cumulative payment ≥ total; the order is
    ///   now `Paid` and `change_amount` is set
    /// - `PartialPayment { remaining }` otherwise; status unchanged
    ///
    /// ## Errors
    /// - `InvalidPaymentAmount` if `amount <= 0`, above the single-tender
    ///   cap, or the running total would overflow (order untouched)
    /// - `InvalidOrderState` if the order is not pending
    /// - `EmptyOrder` if there is nothing to pay for
    pub fn process_payment(&mut self, amount: Money) -> CoreResult<PaymentOutcome> {
        validate_payment_amount(amount).map_err(|e| CoreError::InvalidPaymentAmount {
            reason: e.to_string(),
        })?;
        self.ensure_pending("accept payment")?;
        if self.lines.is_empty() {
            return Err(CoreError::EmptyOrder {
                order_id: self.id.clone(),
            });
        }

        self.payment_amount = self.payment_amount.checked_add(amount).ok_or_else(|| {
            CoreError::InvalidPaymentAmount {
                reason: format!("{} would overflow the amount paid", amount),
            }
        })?;
        self.touch();

        let total = self.total();
        if self.payment_amount >= total {
            self.change_amount = self.payment_amount - total;
            self.status = OrderStatus::Paid;
            self.paid_at = Some(self.updated_at);
            info!(
                order_id = %self.id,
                total = %total,
                paid = %self.payment_amount,
                change = %self.change_amount,
                "Order paid"
            );
            Ok(PaymentOutcome::Success {
                change: self.change_amount,
            })
        } else {
            let remaining = total - self.payment_amount;
            debug!(order_id = %self.id, paid = %self.payment_amount, remaining = %remaining, "Partial payment");
            Ok(PaymentOutcome::PartialPayment { remaining })
        }
    }

    /// Marks a paid order as refunded.
    pub fn refund(&mut self) -> CoreResult<()> {
        if self.status != OrderStatus::Paid {
            return Err(CoreError::invalid_state(&self.id, self.status, "refund"));
        }
        self.status = OrderStatus::Refunded;
        self.touch();
        info!(order_id = %self.id, "Order refunded");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn ensure_pending(&self, operation: &str) -> CoreResult<()> {
        if self.status == OrderStatus::Pending {
            Ok(())
        } else {
            Err(CoreError::invalid_state(&self.id, self.status, operation))
        }
    }

    fn touch(&mut self) {
        // created_at may be in the past for imported orders
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// Generates a receipt number in format: ORD-YYYYMMDD-HHMMSS-NNNN
///
/// NNNN comes from the order's UUID so two orders opened in the same second
/// still print different numbers.
fn generate_receipt_number(created_at: DateTime<Utc>, id: &Uuid) -> String {
    let suffix = (id.as_u128() % 10000) as u32;
    format!("ORD-{}-{:04}", created_at.format("%Y%m%d-%H%M%S"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
