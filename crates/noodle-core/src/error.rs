//! # Error Types
//!
//! Domain-specific error types for noodle-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  noodle-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors, each with an ErrorKind          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  noodle-db errors (separate crate)                                     │
//! │  └── DbError          - Database failures → CoreError::Persistence     │
//! │                                                                         │
//! │  till errors (in app)                                                  │
//! │  └── AppError         - What the operator sees, with an exit code      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → terminal               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Kinds
//! Every [`CoreError`] maps to exactly one [`ErrorKind`]:
//!
//! | Kind                 | Meaning                                        |
//! |----------------------|------------------------------------------------|
//! | `InvalidArgument`    | malformed or out-of-range input                |
//! | `NotFound`           | referenced order or menu item absent           |
//! | `InvalidState`       | order is terminal or otherwise ineligible      |
//! | `PersistenceFailure` | repository call failed (opaque, passed through)|

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a [`CoreError`].
///
/// Presentation layers switch on this instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InvalidState,
    PersistenceFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid_argument"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::InvalidState => write!(f, "invalid_state"),
            ErrorKind::PersistenceFailure => write!(f, "persistence_failure"),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Menu item id is not in the catalog.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Order id is not in the repository.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The order's status does not allow the requested operation.
    ///
    /// ## When This Occurs
    /// - Adding items to a paid order
    /// - Tendering cash against a cancelled order
    /// - Cancelling an order that has already been paid
    #[error("Order {order_id} is {status}, cannot {operation}")]
    InvalidOrderState {
        order_id: String,
        status: OrderStatus,
        operation: String,
    },

    /// Payment was started on an order with no lines.
    #[error("Order {order_id} has no items")]
    EmptyOrder { order_id: String },

    /// Menu item exists but is switched off for today.
    #[error("{name} is not available")]
    MenuItemUnavailable { id: String, name: String },

    /// Order has reached the maximum number of lines.
    #[error("Order cannot have more than {max} lines")]
    OrderTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Tendered amount is zero, negative or unparseable.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Report range bound could not be parsed (strict mode only).
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Repository call failed. The message is opaque to the core.
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl CoreError {
    /// Returns the taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::MenuItemNotFound(_) | CoreError::OrderNotFound(_) => ErrorKind::NotFound,
            CoreError::InvalidOrderState { .. }
            | CoreError::EmptyOrder { .. }
            | CoreError::MenuItemUnavailable { .. } => ErrorKind::InvalidState,
            CoreError::OrderTooLarge { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::InvalidPaymentAmount { .. }
            | CoreError::InvalidDateRange(_)
            | CoreError::Validation(_) => ErrorKind::InvalidArgument,
            CoreError::Persistence(_) => ErrorKind::PersistenceFailure,
        }
    }

    /// Creates an InvalidOrderState error.
    pub fn invalid_state(
        order_id: impl Into<String>,
        status: OrderStatus,
        operation: impl Into<String>,
    ) -> Self {
        CoreError::InvalidOrderState {
            order_id: order_id.into(),
            status,
            operation: operation.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable quantity or date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two menu items with one id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_state("ord-1", OrderStatus::Paid, "add items");
        assert_eq!(err.to_string(), "Order ord-1 is paid, cannot add items");

        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "menu item id".to_string(),
            value: "lomi".to_string(),
        };
        assert_eq!(err.to_string(), "menu item id 'lomi' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CoreError::OrderNotFound("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::EmptyOrder {
                order_id: "x".into()
            }
            .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            CoreError::Persistence("disk full".into()).kind(),
            ErrorKind::PersistenceFailure
        );
        assert_eq!(ErrorKind::InvalidState.to_string(), "invalid_state");
    }
}
