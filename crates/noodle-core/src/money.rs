//! # Money Module
//!
//! Peso amounts as integer centavos.
//!
//! ## Centavos, Never Floats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  f64:   10.10 + 20.20 = 30.299999999999997   → receipt shows 30.29?     │
//! │  i64:    1010 +  2020 = 3030                 → exactly 30.30            │
//! │                                                                         │
//! │  Cash typed at the counter ("55.3") is parsed straight into centavos;   │
//! │  the only division (averages, tax) rounds half up, once, at the end.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use noodle_core::money::Money;
//!
//! let pancit = Money::from_cents(2500); // 25.00
//! let two_bowls = pancit.multiply_quantity(2); // 50.00
//! let total = two_bowls + Money::from_cents(3000);
//! assert_eq!(total.to_plain_string(), "80.00");
//!
//! // Cash typed at the till is parsed, never converted from a float
//! let tendered = Money::parse("100").unwrap();
//! assert_eq!(tendered.cents(), 10000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Currency symbol used by [`Money`]'s `Display` implementation.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as `tendered - total` may go negative
///   before they are clamped
/// - **Tuple struct**: serializes as a bare integer
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► OrderLine.unit_price ──► OrderLine.line_total
///                                                   │
///                    Order.subtotal ◄───────────────┘
///                         │
///                         ├──► tax ──► Order.total ──► PaymentSession
///                         │
///                         └──► SalesBucket.total_sales ──► CSV "80.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use noodle_core::money::Money;
    ///
    /// let price = Money::from_cents(2500);
    /// assert_eq!(price.cents(), 2500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses an amount typed by the cashier, e.g. `"25"`, `"25.5"`, `"25.50"`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At least one digit before the decimal point
    /// - At most two digits after it
    /// - Surrounding whitespace is ignored
    ///
    /// ## Example
    /// ```rust
    /// use noodle_core::money::Money;
    ///
    /// assert_eq!(Money::parse("30.5").unwrap().cents(), 3050);
    /// assert!(Money::parse("30.505").is_err());
    /// assert!(Money::parse("thirty").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major_str, minor_str) = match unsigned.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (unsigned, ""),
        };

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits, e.g. 25.50"));
        }
        if minor_str.len() > 2 || !minor_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = major_str
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad decimals"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major_units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `self + other`, or `None` past the range of `i64`.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns `self - other`, floored at zero.
    ///
    /// Change due and remaining balance are both computed this way.
    ///
    /// ## Example
    /// ```rust
    /// use noodle_core::money::Money;
    ///
    /// let total = Money::from_cents(8000);
    /// assert_eq!(Money::from_cents(10000).saturating_diff(total).cents(), 2000);
    /// assert_eq!(Money::from_cents(5000).saturating_diff(total).cents(), 0);
    /// ```
    #[inline]
    pub const fn saturating_diff(&self, other: Money) -> Money {
        let diff = self.0 - other.0;
        if diff > 0 {
            Money(diff)
        } else {
            Money(0)
        }
    }

    /// Calculates tax for the given rate, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// Adding 5000 before the division rounds half up.
    ///
    /// ## Example
    /// ```rust
    /// use noodle_core::money::Money;
    /// use noodle_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(8000);
    /// let vat = TaxRate::from_bps(1200); // 12%
    /// assert_eq!(subtotal.calculate_tax(vat).cents(), 960);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 prevents overflow on large amounts
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Line total for `qty` units at this price.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Divides by `divisor`, rounding half away from zero.
    ///
    /// A zero divisor yields zero; averages over empty groups are 0.00.
    ///
    /// ## Example
    /// ```rust
    /// use noodle_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1000).divide_rounded(3).cents(), 333);
    /// assert_eq!(Money::from_cents(1001).divide_rounded(2).cents(), 501);
    /// assert_eq!(Money::from_cents(1000).divide_rounded(0).cents(), 0);
    /// ```
    pub fn divide_rounded(&self, divisor: i64) -> Money {
        if divisor == 0 {
            return Money::zero();
        }
        let n = self.0 as i128;
        let d = divisor as i128;
        let half = d.abs() / 2;
        let rounded = if (n >= 0) == (d > 0) {
            (n.abs() + half) / d.abs()
        } else {
            -((n.abs() + half) / d.abs())
        };
        Money(rounded as i64)
    }

    /// Renders the amount with exactly two decimals and no symbol: `"80.00"`.
    ///
    /// This is the CSV representation.
    pub fn to_plain_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major_units().abs(), self.minor_units())
    }

    /// Renders the amount with the given currency symbol: `"₱80.00"`.
    pub fn format_with(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.major_units().abs(),
            self.minor_units()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default peso symbol.
///
/// A presentation layer with its own locale should call
/// [`Money::format_with`] instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(DEFAULT_CURRENCY_SYMBOL))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
