//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1499 × 0.08 = 119.92000000000002  ❌ WRONG!                          │
//! │                                                                         │
//! │  With integer cents a percentage still has to be rounded:               │
//! │    10% of 1099 cents = 109.9 cents → 110 ❌ precision lost mid-pipeline │
//! │                                                                         │
//! │  OUR SOLUTION: Exact base-10 decimals                                   │
//! │    10% of 10.99 = 1.099 exactly                                         │
//! │    Rounding happens ONCE, when the amount is displayed                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::money::Money;
//! use cartwise_core::types::Rate;
//!
//! let price = Money::from_major(1499);
//! let line = price.multiply_quantity(2);            // 2998
//! let off = line.percent(Rate::from_bps(800));      // 239.84, not rounded
//! assert_eq!(off.to_string(), "239.84");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in major currency units (rupees, dollars, ...).
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact for every percentage we compute, and the
///   sign lets intermediate differences go below zero before clamping
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Serialized as a string**: JSON numbers would reintroduce floats in
///   the rendering layer
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► LineItem.price ──► LineItem.line_total ──► Cart.subtotal
///                                                                   │
///           DiscountLine.amount ◄── rule.percent(rate) ◄────────────┘
///                    │
///                    ▼
///     DiscountResult.total_discount ──► final_total ──► format_money()
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from a whole number of major units.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let price = Money::from_major(620);
    /// assert_eq!(price.to_string(), "620.00");
    /// ```
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let unit_price = Money::from_major(55);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_major(165));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `rate` percent of this amount, at full precision.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    /// use cartwise_core::types::Rate;
    ///
    /// let subtotal = Money::from_major(2500);
    /// let off = subtotal.percent(Rate::from_bps(1500)); // 15%
    /// assert_eq!(off, Money::from_major(375));
    /// ```
    pub fn percent(&self, rate: Rate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Clamps negative values to zero.
    ///
    /// Used for `final_total = max(subtotal - discount, 0)`.
    #[inline]
    pub fn non_negative(self) -> Money {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Rounds to whole major units, half away from zero.
    ///
    /// This is a presentation step. Nothing inside discount evaluation
    /// calls it.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Money::from_decimal(Decimal::new(1195, 1)); // 119.5
    /// assert_eq!(amount.round_whole(), Money::from_major(120));
    /// ```
    pub fn round_whole(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with two decimal places, without a currency symbol.
///
/// ## Note
/// This is for debugging and logs. Use [`crate::display::format_money`] for
/// what the customer sees.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
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

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
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
