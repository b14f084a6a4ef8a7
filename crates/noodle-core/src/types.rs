//! # Domain Types
//!
//! Leaf domain types shared by the order, payment and statistics modules.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │   OrderStatus   │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (business)  │   │  Pending        │   │  bps (u32)      │       │
//! │  │  name           │   │  Paid           │   │  1200 = 12%     │       │
//! │  │  price (Money)  │   │  Cancelled      │   └─────────────────┘       │
//! │  │  category       │   │  Refunded       │                             │
//! │  │  is_available   │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Order / OrderLine live in `order.rs`, statistics values in            │
//! │  `statistics.rs`.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{
    validate_menu_item_id, validate_menu_item_name, validate_price, ValidationResult,
};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1200 bps = 12% (Philippine VAT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink that can be ordered.
///
/// Immutable once created: a price change is a new `MenuItem` with the same
/// id. Orders snapshot the price when a line is added, so historical orders
/// are never affected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    /// Business identifier, e.g. `"pancit-canton"`.
    pub id: String,

    /// Display name shown on the menu board and receipts.
    pub name: String,

    /// Current price.
    pub price: Money,

    /// Menu section, e.g. `"Noodles"`, `"Drinks"`.
    pub category: String,

    /// Whether the kitchen can serve this item right now.
    pub is_available: bool,
}

impl MenuItem {
    /// Creates an available menu item.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
            is_available: true,
        }
    }

    /// Returns a copy with the availability flag changed.
    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    /// Checks the item's own rules: non-blank id and name, positive price.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_menu_item_id(&self.id)?;
        validate_menu_item_name(&self.name)?;
        validate_price(self.price)
    }

    /// Returns true if [`MenuItem::validate`] passes.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// ## State Machine
/// ```text
///              process_payment (fully paid)
///   Pending ─────────────────────────────────► Paid ──refund()──► Refunded
///      │
///      └──cancel()──► Cancelled
///
///   Paid, Cancelled and Refunded are terminal for line mutation and payment.
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is being built at the counter.
    Pending,
    /// Order has been fully paid.
    Paid,
    /// Order was abandoned before payment.
    Cancelled,
    /// Paid order whose money was returned.
    Refunded,
}

impl OrderStatus {
    /// Returns true for states that reject line mutation and payment.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Label used in CSV exports and receipts.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Paid => write!(f, "paid"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Refunded => write!(f, "refunded"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
