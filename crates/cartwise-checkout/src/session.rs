//! # Checkout Session
//!
//! One shopper's cart, the coupon they applied and the clock used to
//! evaluate happy hour.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     CheckoutSession Locking                             │
//! │                                                                         │
//! │  UI handler ──┐                                                        │
//! │               ├──► Mutex<Cart> ──────┐                                  │
//! │  refresh task ┘    Mutex<CouponEntry>├──► snapshot ──► DiscountEngine  │
//! │                    Arc<dyn Clock> ───┘    (locks released)  (pure)     │
//! │                                                                         │
//! │  NOTE: Locks are held only to copy or mutate state, never while        │
//! │        evaluating and never across an `.await`.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cartwise_core::{
    Cart, Catalog, ClockStatus, CouponEntry, DiscountEngine, DiscountLine, DiscountPolicy,
    DiscountResult, LineItem, Money, SummaryView,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Snapshots
// =============================================================================

/// Everything the checkout screen shows, computed at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub coupon: CouponEntry,
    pub discounts: DiscountResult,
    pub view: SummaryView,
    pub clock: ClockStatus,
    pub evaluated_at: NaiveDateTime,
}

impl CartSummary {
    pub fn final_total(&self) -> Money {
        self.discounts.final_total
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub session_id: Uuid,
    pub store_name: String,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub lines: Vec<DiscountLine>,
    pub total_discount: Money,
    pub final_total: Money,
    /// Formatted total, e.g. `₹4100`.
    pub total_text: String,
    pub completed_at: NaiveDateTime,
}

// =============================================================================
// Session
// =============================================================================

pub struct CheckoutSession {
    id: Uuid,
    store_name: String,
    policy: DiscountPolicy,
    engine: DiscountEngine,
    catalog: Catalog,
    cart: Mutex<Cart>,
    coupon: Mutex<CouponEntry>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("id", &self.id)
            .field("store_name", &self.store_name)
            .field("products", &self.catalog.products().len())
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Opens a session with an empty cart. The config is validated first.
    pub fn new(
        config: &CheckoutConfig,
        catalog: Catalog,
        clock: Arc<dyn Clock>,
    ) -> CheckoutResult<Self> {
        config.validate()?;

        let session = CheckoutSession {
            id: Uuid::new_v4(),
            store_name: config.store.name.clone(),
            policy: config.discounts.clone(),
            engine: DiscountEngine::from_policy(&config.discounts),
            catalog,
            cart: Mutex::new(Cart::new()),
            coupon: Mutex::new(CouponEntry::Cleared),
            clock,
        };

        info!(
            session = %session.id,
            store = %session.store_name,
            rules = ?session.engine.rule_names(),
            "Checkout session opened"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &DiscountPolicy {
        &self.policy
    }

    /// The currently applied coupon entry.
    pub fn coupon(&self) -> CouponEntry {
        self.lock_coupon().clone()
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock_cart())
    }

    fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        f(&mut self.lock_cart())
    }

    // A poisoned lock still holds a consistent cart: every mutation is a
    // single core call that either completes or returns an error.
    fn lock_cart(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_coupon(&self) -> MutexGuard<'_, CouponEntry> {
        self.coupon.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds one unit of a catalog product.
    pub fn add_product(&self, product_id: u32) -> CheckoutResult<()> {
        let product = self.catalog.find(product_id)?;
        self.with_cart_mut(|cart| cart.add_product(product))?;

        debug!(session = %self.id, product_id, name = %product.name, "Added to cart");
        Ok(())
    }

    /// Sets a line's quantity, clamped to 1-99. Returns the stored quantity.
    pub fn update_quantity(&self, product_id: u32, quantity: i64) -> CheckoutResult<u32> {
        let stored = self.with_cart_mut(|cart| cart.update_quantity(product_id, quantity))?;

        debug!(
            session = %self.id,
            product_id,
            requested = quantity,
            stored,
            "Quantity updated"
        );
        Ok(stored)
    }

    pub fn remove_item(&self, product_id: u32) -> CheckoutResult<()> {
        self.with_cart_mut(|cart| cart.remove_item(product_id))?;
        debug!(session = %self.id, product_id, "Removed from cart");
        Ok(())
    }

    /// Applies the text of the coupon field.
    ///
    /// Empty or rejected input removes the previous coupon. An accepted code
    /// is stored even if it is unknown; the discount summary then explains it.
    pub fn apply_coupon(&self, input: &str) -> CouponEntry {
        let entry = CouponEntry::parse(input);
        *self.lock_coupon() = entry.clone();

        info!(session = %self.id, entry = ?entry, "Coupon entry");
        entry
    }

    /// Empties the cart and removes the applied coupon.
    pub fn clear(&self) {
        self.with_cart_mut(Cart::clear);
        *self.lock_coupon() = CouponEntry::Cleared;
        info!(session = %self.id, "Cart cleared");
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Evaluates the current cart at the clock's current time.
    pub fn summary(&self) -> CartSummary {
        let (items, subtotal) = self.with_cart(|cart| (cart.items().to_vec(), cart.subtotal()));
        let coupon = self.coupon();
        let now = self.clock.now();

        let discounts = self
            .engine
            .evaluate(&items, subtotal, coupon.applied_code(), now);
        let symbol = &self.policy.currency_symbol;

        debug!(
            session = %self.id,
            items = items.len(),
            subtotal = %subtotal,
            raw_discount = %discounts.raw_discount,
            total_discount = %discounts.total_discount,
            capped = discounts.cap_applied(),
            "Discounts evaluated"
        );

        CartSummary {
            view: SummaryView::build(&discounts, symbol),
            clock: ClockStatus::at(now, &self.policy.happy_hour),
            items,
            subtotal,
            coupon,
            discounts,
            evaluated_at: now,
        }
    }

    /// Completes the sale.
    ///
    /// The cart is left as it is; call [`clear`](Self::clear) to start over.
    pub fn checkout(&self) -> CheckoutResult<Receipt> {
        if self.with_cart(Cart::is_empty) {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = self.summary();
        let receipt = Receipt {
            session_id: self.id,
            store_name: self.store_name.clone(),
            total_text: summary.view.total_text.clone(),
            items: summary.items,
            subtotal: summary.subtotal,
            lines: summary.discounts.lines,
            total_discount: summary.discounts.total_discount,
            final_total: summary.discounts.final_total,
            completed_at: summary.evaluated_at,
        };

        info!(
            session = %self.id,
            total = %receipt.total_text,
            discount = %receipt.total_discount,
            "Checkout successful"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use cartwise_core::{CoreError, DiscountSource};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn session_at(hour: u32) -> (CheckoutSession, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(at(hour)));
        let session =
            CheckoutSession::new(&CheckoutConfig::default(), Catalog::default(), clock.clone())
                .unwrap();
        (session, clock)
    }

    #[test]
    fn test_empty_session_summary() {
        let (session, _) = session_at(10);
        let summary = session.summary();

        assert!(summary.items.is_empty());
        assert!(summary.discounts.lines.is_empty());
        assert_eq!(summary.view.rows[0].label, "No discounts applied");
        assert_eq!(summary.view.total_text, "₹0");
        assert!(!summary.clock.happy_hour);
    }

    #[test]
    fn test_add_and_update() {
        let (session, _) = session_at(10);
        session.add_product(2).unwrap(); // Basmati Rice 5kg, 620
        session.add_product(2).unwrap();

        assert_eq!(session.with_cart(|c| c.get(2).map(|i| i.quantity)), Some(2));
        assert_eq!(session.update_quantity(2, 500).unwrap(), 99);
        assert_eq!(session.update_quantity(2, 0).unwrap(), 1);
    }

    #[test]
    fn test_unknown_product_and_missing_item() {
        let (session, _) = session_at(10);

        let err = session.add_product(999).unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::ProductNotFound(999))));

        let err = session.update_quantity(3, 3).unwrap_err();
        assert!(matches!(err, CheckoutError::Core(CoreError::ItemNotInCart(3))));

        assert!(session.remove_item(3).is_err());
    }

    #[test]
    fn test_happy_hour_follows_clock() {
        let (session, clock) = session_at(17);
        session.add_product(2).unwrap();

        let before = session.summary();
        assert!(before
            .discounts
            .lines
            .iter()
            .all(|l| l.source != DiscountSource::HappyHour));

        clock.set(at(18));
        let during = session.summary();
        assert!(during.clock.happy_hour);
        let line = during
            .discounts
            .lines
            .iter()
            .find(|l| l.source == DiscountSource::HappyHour)
            .unwrap();
        assert_eq!(line.amount, Money::from_decimal(dec!(31)));
    }

    #[test]
    fn test_coupon_flow() {
        let (session, _) = session_at(10);
        session.add_product(2).unwrap(); // 620

        let entry = session.apply_coupon(" save 10 ");
        assert_eq!(entry, CouponEntry::Applied("SAVE10".to_string()));

        let summary = session.summary();
        assert_eq!(summary.discounts.total_discount, Money::from_major(62));
        assert_eq!(summary.view.rows[0].label, "Coupon SAVE10 (10% off cart)");

        assert_eq!(session.apply_coupon("9LIVES"), CouponEntry::Rejected);
        assert!(session.summary().discounts.lines.is_empty());
    }

    #[test]
    fn test_unknown_coupon_is_informational() {
        let (session, _) = session_at(10);
        session.add_product(2).unwrap();
        session.apply_coupon("BOGUS");

        let summary = session.summary();
        assert_eq!(summary.discounts.lines.len(), 1);
        assert_eq!(summary.discounts.lines[0].label, "Coupon \"BOGUS\" not recognized");
        assert_eq!(summary.discounts.total_discount, Money::zero());
    }

    #[test]
    fn test_clear_removes_coupon() {
        let (session, _) = session_at(10);
        session.add_product(2).unwrap();
        session.apply_coupon("SAVE10");

        session.clear();
        assert!(session.with_cart(Cart::is_empty));
        assert_eq!(session.coupon(), CouponEntry::Cleared);
    }

    #[test]
    fn test_checkout_empty_cart() {
        let (session, _) = session_at(10);
        assert!(matches!(session.checkout(), Err(CheckoutError::EmptyCart)));
    }

    #[test]
    fn test_checkout_receipt() {
        let (session, _) = session_at(10);
        session.add_product(4).unwrap(); // Smart Watch 2499
        session.update_quantity(4, 2).unwrap();

        let receipt = session.checkout().unwrap();
        assert_eq!(receipt.session_id, session.id());
        assert_eq!(receipt.subtotal, Money::from_major(4998));
        // 8% electronics on 4998
        assert_eq!(receipt.total_discount, Money::from_decimal(dec!(399.84)));
        assert_eq!(receipt.total_text, "₹4598");
        assert_eq!(receipt.completed_at, at(10));

        // cart survives checkout
        assert_eq!(session.with_cart(Cart::item_count), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CheckoutConfig::default();
        config.refresh.interval_secs = 0;
        let result = CheckoutSession::new(
            &config,
            Catalog::default(),
            Arc::new(FixedClock::new(at(10))),
        );
        assert!(matches!(result, Err(CheckoutError::InvalidConfig(_))));
    }
}
