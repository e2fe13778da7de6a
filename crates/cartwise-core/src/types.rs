//! # Domain Types
//!
//! Core domain types used throughout Cartwise.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │  DiscountLine   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │   │  label          │       │
//! │  │  name           │   │  price          │   │  amount         │       │
//! │  │  price          │   │  category       │   │  is_cap_note    │       │
//! │  │  category       │   │  quantity       │   │  source         │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │      Rate       │   │    Category     │   │ DiscountResult  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Grocery        │   │  lines          │       │
//! │  │  800 = 8%       │   │  Electronics    │   │  total_discount │       │
//! │  └─────────────────┘   │  Fashion        │   │  final_total    │       │
//! │                        │  Stationery     │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (electronics discount), 3500 bps = 35% (discount cap)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// 100%.
    pub const FULL: Rate = Rate(10_000);

    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact fraction (800 bps → 0.08).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Renders the percentage without trailing zeros: `"10"`, `"8.25"`.
    pub fn percent_label(&self) -> String {
        Decimal::new(i64::from(self.0), 2).normalize().to_string()
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent_label())
    }
}

// =============================================================================
// Category
// =============================================================================

/// Product category. Category discounts key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Category {
    Grocery,
    Electronics,
    Fashion,
    Stationery,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Grocery,
        Category::Electronics,
        Category::Fashion,
        Category::Stationery,
    ];

    /// The display name, as used in discount labels.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Grocery => "Grocery",
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::Stationery => "Stationery",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: u32,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Category used by category discounts.
    pub category: Category,
}

// =============================================================================
// Line Item
// =============================================================================

/// A product in the cart with its quantity.
///
/// Name, price and category are copied from the product when it is added,
/// so the cart keeps displaying the same data if the catalog changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: u32,
    pub name: String,
    pub price: Money,
    pub category: Category,
    /// Always at least 1 inside a [`crate::cart::Cart`].
    pub quantity: u32,
}

impl LineItem {
    /// Creates a line item for `quantity` units of `product`.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        LineItem {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            quantity,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Discount Line
// =============================================================================

/// Which rule produced a [`DiscountLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum DiscountSource {
    Bulk,
    Category(Category),
    HappyHour,
    Coupon,
    Cap,
}

/// One row of the discount breakdown.
///
/// A zero `amount` marks an informational row (invalid or unrecognized
/// coupon, coupon below its minimum subtotal). Callers show these to the
/// user but must not treat them as failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountLine {
    pub label: String,
    pub amount: Money,
    /// True only for the synthetic "Discount Cap Applied" row.
    pub is_cap_note: bool,
    pub source: DiscountSource,
}

impl DiscountLine {
    /// A discount that reduces the total.
    pub fn savings(source: DiscountSource, label: impl Into<String>, amount: Money) -> Self {
        DiscountLine {
            label: label.into(),
            amount,
            is_cap_note: false,
            source,
        }
    }

    /// A zero-amount row that only carries a message.
    pub fn notice(source: DiscountSource, label: impl Into<String>) -> Self {
        Self::savings(source, label, Money::zero())
    }

    /// The row recording how much the cap removed.
    pub fn cap_note(label: impl Into<String>, excess: Money) -> Self {
        DiscountLine {
            label: label.into(),
            amount: excess,
            is_cap_note: true,
            source: DiscountSource::Cap,
        }
    }

    /// True for rows that carry no amount.
    #[inline]
    pub fn is_informational(&self) -> bool {
        self.amount.is_zero() && !self.is_cap_note
    }
}

// =============================================================================
// Discount Result
// =============================================================================

/// Output of one discount evaluation.
///
/// ## Invariants
/// - `final_total = max(subtotal - total_discount, 0)`
/// - `total_discount ≤ subtotal × cap rate`
/// - `raw_discount` is the sum of all non-cap line amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResult {
    pub lines: Vec<DiscountLine>,
    pub subtotal: Money,
    pub raw_discount: Money,
    pub total_discount: Money,
    pub final_total: Money,
}

impl DiscountResult {
    /// True if the cap row is present.
    pub fn cap_applied(&self) -> bool {
        self.lines.iter().any(|l| l.is_cap_note)
    }

    /// Rows that actually reduce the total.
    pub fn applied_lines(&self) -> impl Iterator<Item = &DiscountLine> {
        self.lines
            .iter()
            .filter(|l| !l.is_cap_note && l.amount.is_positive())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
