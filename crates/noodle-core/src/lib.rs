//! # noodle-core: Pure Business Logic for Noodle Money Buddy
//!
//! Orders, payments and sales statistics for a small noodle shop, as plain
//! values and functions with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Noodle Money Buddy Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    till (apps/till)                             │   │
//! │  │    config ──► TillService ──► CLI commands                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ noodle-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  catalog  │  │   order   │  │  payment  │  │   │
//! │  │   │   Money   │  │ MenuCat.. │  │   Order   │  │ Processor │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │statistics │  │  export   │  │repository │                 │   │
//! │  │   │ buckets   │  │   CSV     │  │  (trait)  │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   noodle-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, Repository implementations   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - MenuItem, OrderStatus, TaxRate
//! - [`catalog`] - Immutable menu lookup
//! - [`order`] - Order and OrderLine with derived totals
//! - [`payment`] - Tender validation and change calculation
//! - [`statistics`] - Daily buckets, top sellers, summaries
//! - [`export`] - CSV rendering
//! - [`repository`] - The async storage contract
//! - [`error`] / [`validation`] - Typed errors and input rules
//!
//! ## Example Usage
//!
//! ```rust
//! use noodle_core::{MenuItem, Money, Order, PaymentOutcome, TaxRate};
//!
//! let canton = MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles");
//! let lomi = MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles");
//!
//! let mut order = Order::new(TaxRate::zero());
//! order.add_item(&canton, 2).unwrap();
//! order.add_item(&lomi, 1).unwrap();
//!
//! // ₱50 now, ₱30 later
//! let first = order.process_payment(Money::from_cents(5000)).unwrap();
//! assert_eq!(first, PaymentOutcome::PartialPayment { remaining: Money::from_cents(3000) });
//!
//! let second = order.process_payment(Money::from_cents(3000)).unwrap();
//! assert_eq!(second, PaymentOutcome::Success { change: Money::zero() });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod export;
pub mod money;
pub mod order;
pub mod payment;
pub mod repository;
pub mod statistics;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::MenuCatalog;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use order::{Order, OrderLine, OrderRecord};
pub use payment::{AppliedPayment, PaymentOutcome, PaymentProcessor, PaymentSession, PaymentValidation};
pub use repository::Repository;
pub use statistics::{
    DateRange, ItemGrouping, ItemSales, Period, SalesBucket, SalesStatistics,
    StatisticsAggregator, StatusCounts,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single order.
///
/// ## Business Reason
/// A noodle counter order never legitimately has a hundred different dishes;
/// hitting this means something is stuck in a loop.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Catches fat-finger entries (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Largest price or single tender the till accepts, in centavos (₱10,000,000.00).
///
/// ## Business Reason
/// Keeps every total well inside `i64`: 100 lines × 999 × this price, plus
/// 100% tax, is still about 2×10¹⁴ centavos.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000;
