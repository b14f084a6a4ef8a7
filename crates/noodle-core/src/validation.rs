//! # Validation Module
//!
//! Input validation utilities for the till.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (outside this workspace)                        │
//! │  └── Immediate feedback: empty fields, keypad input                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Use cases / command line (apps/till)                         │
//! │  ├── Raw text → typed values (parse_quantity, Money::parse)            │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign keys (order_lines → orders)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use noodle_core::validation::{parse_quantity, validate_quantity};
//!
//! let qty = parse_quantity(" 3 ").unwrap();
//! validate_quantity(qty).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT_CENTS, MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a menu item id.
///
/// ## Rules
/// - Must not be blank
/// - At most 64 characters
/// - No whitespace inside (ids are typed on the command line)
///
/// ## Example
/// ```rust
/// use noodle_core::validation::validate_menu_item_id;
///
/// assert!(validate_menu_item_id("pancit-canton").is_ok());
/// assert!(validate_menu_item_id("").is_err());
/// assert!(validate_menu_item_id("pancit canton").is_err());
/// ```
pub fn validate_menu_item_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "menu item id".to_string(),
        });
    }

    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "menu item id".to_string(),
            max: 64,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "menu item id".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a menu item display name.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
pub fn validate_menu_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an optional customer name and returns it trimmed.
///
/// Blank names collapse to `None`.
pub fn validate_customer_name(name: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if name.chars().count() > 80 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 80,
        });
    }

    Ok(Some(name.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added to an order.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Parses a quantity typed into the quantity field.
///
/// Zero and negative values parse successfully: `update_quantity` treats them
/// as "remove the line". Anything that is not a whole number fails.
///
/// ## Example
/// ```rust
/// use noodle_core::validation::parse_quantity;
///
/// assert_eq!(parse_quantity("4").unwrap(), 4);
/// assert_eq!(parse_quantity("0").unwrap(), 0);
/// assert!(parse_quantity("1.5").is_err());
/// assert!(parse_quantity("two").is_err());
/// ```
pub fn parse_quantity(input: &str) -> ValidationResult<i64> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity".to_string(),
        });
    }

    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: format!("'{}' is not a whole number", trimmed),
        })
}

/// Validates a price.
///
/// ## Rules
/// - Must be positive; free items are not sold through the till
/// - At most [`MAX_AMOUNT_CENTS`]
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    validate_amount_cap("price", price)
}

/// Validates a tendered payment amount.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_AMOUNT_CENTS`] in one tender
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    validate_amount_cap("payment amount", amount)
}

fn validate_amount_cap(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_AMOUNT_CENTS,
        });
    }
    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates order size before a new line is appended.
///
/// ## Rules
/// - Must not exceed MAX_ORDER_LINES (100)
pub fn validate_order_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "order lines".to_string(),
            min: 0,
            max: MAX_ORDER_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
