//! # Payment Processing
//!
//! Tender validation and change calculation for cash orders.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tender Flow                                     │
//! │                                                                         │
//! │  1. initiate(order)          → PaymentSession { required, current,     │
//! │                                                  remaining }           │
//! │                                                                         │
//! │  2. validate(amount, remaining)                                        │
//! │     ├── amount ≤ 0           → error, nothing applied                  │
//! │     ├── amount > cap         → error, nothing applied                  │
//! │     ├── amount < remaining   → partial                                 │
//! │     ├── amount > remaining   → overpayment, change computed            │
//! │     └── amount > 10× remaining → warning only (probable typo)          │
//! │                                                                         │
//! │  3. apply(order, amount)     → Order::process_payment                  │
//! │     ├── PartialPayment { remaining }   (order stays Pending)           │
//! │     └── Success { change }             (order is now Paid)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The processor holds configuration only. Every call works on the order
//! snapshot it is handed.

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::order::Order;
use crate::types::OrderStatus;
use crate::validation::validate_payment_amount;

/// Default ratio above which a tender triggers an overpayment warning.
pub const DEFAULT_OVERPAYMENT_WARNING_MULTIPLIER: i64 = 10;

// =============================================================================
// Outcome Types
// =============================================================================

/// Result of applying one tender to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// Cumulative payment covers the total; the order is now Paid.
    Success { change: Money },
    /// Still short by `remaining`; the order stays Pending.
    PartialPayment { remaining: Money },
}

impl PaymentOutcome {
    #[inline]
    pub const fn is_complete(&self) -> bool {
        matches!(self, PaymentOutcome::Success { .. })
    }
}

/// An applied tender and the warnings it raised on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPayment {
    pub outcome: PaymentOutcome,
    pub warnings: Vec<String>,
}

/// Snapshot of what an order still needs before tendering starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentSession {
    /// Order total.
    pub required: Money,
    /// Paid so far.
    pub current: Money,
    /// `max(0, required - current)`.
    pub remaining: Money,
}

/// Classification of a proposed tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentValidation {
    pub is_valid: bool,
    pub is_partial: bool,
    pub is_overpayment: bool,
    pub change: Money,
    /// Hard failures; when non-empty the tender must not be applied.
    pub errors: Vec<String>,
    /// Soft warnings for the cashier to confirm.
    pub warnings: Vec<String>,
}

// =============================================================================
// Payment Processor
// =============================================================================

/// Stateless tender validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentProcessor {
    overpayment_warning_multiplier: i64,
}

impl Default for PaymentProcessor {
    fn default() -> Self {
        PaymentProcessor {
            overpayment_warning_multiplier: DEFAULT_OVERPAYMENT_WARNING_MULTIPLIER,
        }
    }
}

impl PaymentProcessor {
    /// Creates a processor with a custom warning multiplier (minimum 1).
    pub fn new(overpayment_warning_multiplier: i64) -> Self {
        PaymentProcessor {
            overpayment_warning_multiplier: overpayment_warning_multiplier.max(1),
        }
    }

    pub fn overpayment_warning_multiplier(&self) -> i64 {
        self.overpayment_warning_multiplier
    }

    /// Opens a payment session for an order.
    ///
    /// ## Errors
    /// - `OrderNotFound` if `order` is `None`
    /// - `InvalidOrderState` if the order is not Pending
    /// - `EmptyOrder` if the order has no lines
    pub fn initiate(&self, order_id: &str, order: Option<&Order>) -> CoreResult<PaymentSession> {
        let order = order.ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;

        if order.status() != OrderStatus::Pending {
            return Err(CoreError::invalid_state(
                order.id(),
                order.status(),
                "start payment",
            ));
        }

        if order.lines().is_empty() {
            return Err(CoreError::EmptyOrder {
                order_id: order.id().to_string(),
            });
        }

        let required = order.total();
        let current = order.payment_amount();
        Ok(PaymentSession {
            required,
            current,
            remaining: self.calculate_remaining(required, current),
        })
    }

    /// Classifies a proposed tender against the amount still required.
    ///
    /// Never fails: problems are reported in `errors` and `warnings`.
    pub fn validate(&self, amount: Money, required: Money) -> PaymentValidation {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let is_valid = match validate_payment_amount(amount) {
            Ok(()) => true,
            Err(ValidationError::MustBePositive { .. }) => {
                errors.push("Payment amount must be greater than zero".to_string());
                false
            }
            Err(err) => {
                errors.push(err.to_string());
                false
            }
        };

        let is_partial = is_valid && amount < required;
        let is_overpayment = amount > required;

        // A limit past i64 cannot be exceeded
        let over_limit = required
            .cents()
            .checked_mul(self.overpayment_warning_multiplier)
            .is_some_and(|limit| amount.cents() > limit);

        if is_valid && required.is_positive() && over_limit {
            warn!(amount = %amount, required = %required, "Unusually large tender");
            warnings.push(format!(
                "Tendered {} is more than {}× the amount due ({})",
                amount, self.overpayment_warning_multiplier, required
            ));
        }

        PaymentValidation {
            is_valid,
            is_partial,
            is_overpayment,
            change: self.calculate_change(required, amount),
            errors,
            warnings,
        }
    }

    /// `max(0, tendered - required)`
    #[inline]
    pub fn calculate_change(&self, required: Money, tendered: Money) -> Money {
        tendered.saturating_diff(required)
    }

    /// `max(0, required - current)`
    #[inline]
    pub fn calculate_remaining(&self, required: Money, current: Money) -> Money {
        required.saturating_diff(current)
    }

    /// Validates and applies one tender to the order.
    ///
    /// Warnings do not block and come back with the outcome; errors leave
    /// the order untouched.
    pub fn apply(&self, order: &mut Order, amount: Money) -> CoreResult<AppliedPayment> {
        let check = self.validate(amount, order.remaining());
        if let Some(reason) = check.errors.into_iter().next() {
            return Err(CoreError::InvalidPaymentAmount { reason });
        }
        let outcome = order.process_payment(amount)?;
        Ok(AppliedPayment {
            outcome,
            warnings: check.warnings,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{MenuItem, TaxRate};

    fn sample_order() -> Order {
        let mut order = Order::new(TaxRate::zero());
        order
            .add_item(
                &MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles"),
                2,
            )
            .unwrap();
        order
            .add_item(&MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles"), 1)
            .unwrap();
        order
    }

    #[test]
    fn test_initiate() {
        let processor = PaymentProcessor::default();
        let order = sample_order();

        let session = processor.initiate(order.id(), Some(&order)).unwrap();
        assert_eq!(session.required, Money::from_cents(8000));
        assert_eq!(session.current, Money::zero());
        assert_eq!(session.remaining, Money::from_cents(8000));
    }

    #[test]
    fn test_initiate_failures() {
        let processor = PaymentProcessor::default();

        let err = processor.initiate("missing", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let empty = Order::new(TaxRate::zero());
        let err = processor.initiate(empty.id(), Some(&empty)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let mut paid = sample_order();
        paid.process_payment(Money::from_cents(8000)).unwrap();
        let err = processor.initiate(paid.id(), Some(&paid)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_validate_classification() {
        let processor = PaymentProcessor::default();
        let required = Money::from_cents(8000);

        let partial = processor.validate(Money::from_cents(5000), required);
        assert!(partial.is_valid && partial.is_partial && !partial.is_overpayment);
        assert_eq!(partial.change, Money::zero());

        let exact = processor.validate(required, required);
        assert!(exact.is_valid && !exact.is_partial && !exact.is_overpayment);

        let over = processor.validate(Money::from_cents(10000), required);
        assert!(over.is_overpayment);
        assert_eq!(over.change, Money::from_cents(2000));
        assert!(over.warnings.is_empty());

        let zero = processor.validate(Money::zero(), required);
        assert!(!zero.is_valid && !zero.is_partial);
        assert_eq!(zero.errors.len(), 1);
    }

    #[test]
    fn test_large_tender_is_a_warning_not_an_error() {
        let processor = PaymentProcessor::default();
        let check = processor.validate(Money::from_cents(100_000), Money::from_cents(8000));

        assert!(check.is_valid);
        assert!(check.errors.is_empty());
        assert_eq!(check.warnings.len(), 1);
        assert_eq!(check.change, Money::from_cents(92_000));

        let strict = PaymentProcessor::new(2);
        assert_eq!(
            strict
                .validate(Money::from_cents(20_000), Money::from_cents(8000))
                .warnings
                .len(),
            1
        );
    }

    #[test]
    fn test_change_and_remaining() {
        let p = PaymentProcessor::default();
        let total = Money::from_cents(8000);
        assert_eq!(p.calculate_change(total, Money::from_cents(10000)), Money::from_cents(2000));
        assert_eq!(p.calculate_change(total, Money::from_cents(5000)), Money::zero());
        assert_eq!(p.calculate_remaining(total, Money::from_cents(5000)), Money::from_cents(3000));
        assert_eq!(p.calculate_remaining(total, Money::from_cents(9000)), Money::zero());
    }

    #[test]
    fn test_apply() {
        let processor = PaymentProcessor::default();
        let mut order = sample_order();

        let err = processor.apply(&mut order, Money::from_cents(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(order.payment_amount(), Money::zero());

        let first = processor.apply(&mut order, Money::from_cents(5000)).unwrap();
        assert!(!first.outcome.is_complete());
        assert!(first.warnings.is_empty());

        let second = processor.apply(&mut order, Money::from_cents(3000)).unwrap();
        assert_eq!(second.outcome, PaymentOutcome::Success { change: Money::zero() });
        assert_eq!(order.status(), OrderStatus::Paid);
    }

    #[test]
    fn test_apply_carries_warnings() {
        let processor = PaymentProcessor::default();
        let mut order = sample_order();

        let applied = processor.apply(&mut order, Money::from_cents(100_000)).unwrap();
        assert_eq!(applied.outcome, PaymentOutcome::Success { change: Money::from_cents(92_000) });
        assert_eq!(applied.warnings.len(), 1);
    }

    #[test]
    fn test_apply_rejects_tender_that_would_overflow() {
        let processor = PaymentProcessor::default();
        let mut order = sample_order();
        processor.apply(&mut order, Money::from_cents(1000)).unwrap();

        let huge = Money::parse("92233720368547758").unwrap();
        let err = processor.apply(&mut order, huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(order.payment_amount(), Money::from_cents(1000));
        assert_eq!(order.status(), OrderStatus::Pending);

        // The warning limit itself would overflow; no warning, no panic
        let check = processor.validate(Money::from_cents(500), Money::from_cents(i64::MAX / 2));
        assert!(check.is_valid);
        assert!(check.warnings.is_empty());
    }

    #[test]
    fn test_outcome_serde() {
        let json = serde_json::to_string(&PaymentOutcome::PartialPayment {
            remaining: Money::from_cents(3000),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"partial_payment","remaining":3000}"#);
    }
}
