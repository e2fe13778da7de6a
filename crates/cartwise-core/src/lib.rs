//! # cartwise-core: Pure Business Logic for Cartwise
//!
//! This crate is the **heart** of Cartwise: the shopping cart, its
//! stacking discount rules and the numbers the checkout shows. Every
//! function is pure, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartwise Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Rendering layer                              │   │
//! │  │    Product grid ──► Cart list ──► Discount rows ──► Total      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cartwise-checkout                               │   │
//! │  │    CheckoutSession, clock, config file, periodic refresh       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartwise-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │   cart   │ │ policy / rules   │  │   │
//! │  │   │ LineItem │ │  Money   │ │   Cart   │ │ DiscountEngine   │  │   │
//! │  │   │ Rate     │ │ (exact)  │ │ Catalog  │ │ coupons          │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Rate, DiscountLine, DiscountResult)
//! - [`money`] - Exact decimal money
//! - [`cart`] / [`catalog`] - Cart operations and the product range
//! - [`coupon`] - Coupon entry, format rules and the coupon table
//! - [`policy`] - Configurable thresholds and rates
//! - [`rules`] / [`engine`] - Discount evaluation
//! - [`display`] - Rounding and formatting for the rendering layer
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, including the discount engine
//! 2. **Time Is an Input**: the engine never reads the clock
//! 3. **Exact Money**: no rounding until display
//! 4. **Explicit Errors**: typed errors for cart and policy problems; coupon
//!    problems are discount lines, not errors
//!
//! ## Example Usage
//!
//! ```rust
//! use cartwise_core::{Cart, Catalog, DiscountEngine, Money};
//! use chrono::NaiveDate;
//!
//! let catalog = Catalog::default();
//! let mut cart = Cart::new();
//! cart.add_product(catalog.find(4).unwrap()).unwrap(); // Smart Watch 2499
//! cart.update_quantity(4, 2).unwrap();
//!
//! let evening = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(19, 0, 0).unwrap();
//! let result = DiscountEngine::default().evaluate(cart.items(), cart.subtotal(), "SAVE10", evening);
//!
//! // 8% electronics (399.84) + 5% happy hour (249.9) + 10% coupon (499.8)
//! assert_eq!(result.lines.len(), 3);
//! assert_eq!(result.total_discount.to_string(), "1149.54");
//! assert!(result.final_total < Money::from_major(4998));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod display;
pub mod engine;
pub mod error;
pub mod money;
pub mod policy;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cartwise_core::Money` instead of
// `use cartwise_core::money::Money`

pub use cart::Cart;
pub use catalog::Catalog;
pub use coupon::CouponEntry;
pub use display::{ClockStatus, SummaryView};
pub use engine::DiscountEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::DiscountPolicy;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum quantity of a line item.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity of a single item in cart.
///
/// ## Business Reason
/// The quantity box accepts 1-99; larger values are clamped, not rejected.
pub const MAX_ITEM_QUANTITY: i64 = 99;
