//! # Discount Engine
//!
//! Combines the independent discount rules into one result.
//!
//! ## Evaluation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(items, subtotal, coupon_code, now)                            │
//! │                                                                         │
//! │  1. Run every rule in order ────────────► lines: Vec<DiscountLine>      │
//! │        bulk, categories, happy hour, coupon                             │
//! │                                                                         │
//! │  2. raw = Σ positive line amounts                                       │
//! │                                                                         │
//! │  3. cap = subtotal × cap_rate                                           │
//! │        raw > cap ? push "Discount Cap Applied" (raw - cap)              │
//! │                    total_discount = cap                                 │
//! │                  : total_discount = raw                                 │
//! │                                                                         │
//! │  4. final_total = max(subtotal - total_discount, 0)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns only its configuration. It is safe to share between
//! threads and to call as often as the caller likes: the same inputs
//! always give the same [`DiscountResult`].

use chrono::NaiveDateTime;

use crate::error::CoreResult;
use crate::money::Money;
use crate::policy::DiscountPolicy;
use crate::rules::{DiscountRule, RuleContext};
use crate::types::{DiscountLine, DiscountResult, LineItem, Rate};

/// Evaluates a fixed list of discount rules and applies the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountEngine {
    rules: Vec<DiscountRule>,
    cap_rate: Rate,
}

impl DiscountEngine {
    /// Creates an engine from an explicit rule list.
    pub fn new(rules: Vec<DiscountRule>, cap_rate: Rate) -> Self {
        DiscountEngine { rules, cap_rate }
    }

    /// Creates an engine from a policy without validating it.
    pub fn from_policy(policy: &DiscountPolicy) -> Self {
        DiscountEngine::new(DiscountRule::from_policy(policy), policy.cap_rate)
    }

    /// Validates the policy, then builds the engine.
    pub fn try_from_policy(policy: &DiscountPolicy) -> CoreResult<Self> {
        policy.validate()?;
        Ok(DiscountEngine::from_policy(policy))
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Rule names in evaluation order, for logging.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(DiscountRule::name).collect()
    }

    /// The share of the subtotal the total discount may not exceed.
    pub fn cap_rate(&self) -> Rate {
        self.cap_rate
    }

    /// Computes every applicable discount line, the capped total discount
    /// and the payable total.
    ///
    /// `subtotal` is taken as given (callers pass the gross cart subtotal);
    /// `now` is local wall-clock time. Invalid or unknown coupons show up as
    /// zero-amount lines, never as errors.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::{Category, DiscountEngine, LineItem, Money};
    /// use chrono::NaiveDate;
    ///
    /// let items = vec![LineItem {
    ///     id: 1,
    ///     name: "Monitor".into(),
    ///     price: Money::from_major(1000),
    ///     category: Category::Electronics,
    ///     quantity: 5,
    /// }];
    /// let now = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(10, 0, 0).unwrap();
    ///
    /// let result = DiscountEngine::default().evaluate(&items, Money::from_major(5000), "", now);
    /// assert_eq!(result.total_discount, Money::from_major(900));
    /// assert_eq!(result.final_total, Money::from_major(4100));
    /// ```
    pub fn evaluate(
        &self,
        items: &[LineItem],
        subtotal: Money,
        coupon_code: &str,
        now: NaiveDateTime,
    ) -> DiscountResult {
        let ctx = RuleContext {
            items,
            subtotal,
            coupon_code,
            now,
        };

        let mut lines: Vec<DiscountLine> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(&ctx))
            .collect();

        let raw_discount: Money = lines
            .iter()
            .map(|l| l.amount)
            .filter(Money::is_positive)
            .sum();

        let max_allowed = subtotal.non_negative().percent(self.cap_rate);
        let total_discount = if raw_discount > max_allowed {
            lines.push(DiscountLine::cap_note(
                format!("Discount Cap Applied (Max {})", self.cap_rate),
                raw_discount - max_allowed,
            ));
            max_allowed
        } else {
            raw_discount
        };

        DiscountResult {
            lines,
            subtotal,
            raw_discount,
            total_discount,
            final_total: (subtotal - total_discount).non_negative(),
        }
    }
}

impl Default for DiscountEngine {
    /// The engine for [`DiscountPolicy::default`].
    fn default() -> Self {
        DiscountEngine::from_policy(&DiscountPolicy::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::subtotal;
    use crate::types::{Category, DiscountSource};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn item(id: u32, price: i64, category: Category, quantity: u32) -> LineItem {
        LineItem {
            id,
            name: format!("Item {}", id),
            price: Money::from_major(price),
            category,
            quantity,
        }
    }

    fn evaluate(items: &[LineItem], coupon: &str, hour: u32) -> DiscountResult {
        DiscountEngine::default().evaluate(items, subtotal(items), coupon, at(hour))
    }

    #[test]
    fn test_rule_names_follow_evaluation_order() {
        assert_eq!(
            DiscountEngine::default().rule_names(),
            ["bulk", "category", "category", "happy_hour", "coupon"]
        );

        let mut policy = DiscountPolicy::default();
        policy.categories.clear();
        assert_eq!(
            DiscountEngine::from_policy(&policy).rule_names(),
            ["bulk", "happy_hour", "coupon"]
        );
    }

    #[test]
    fn test_bulk_and_electronics_stack() {
        let items = [item(1, 1000, Category::Electronics, 5)];
        let result = evaluate(&items, "", 10);

        assert_eq!(result.lines.len(), 2);
        assert_eq!(result.lines[0].source, DiscountSource::Bulk);
        assert_eq!(result.lines[0].amount, Money::from_major(500));
        assert_eq!(
            result.lines[1].source,
            DiscountSource::Category(Category::Electronics)
        );
        assert_eq!(result.lines[1].amount, Money::from_major(400));
        assert!(!result.cap_applied());
        assert_eq!(result.total_discount, Money::from_major(900));
        assert_eq!(result.final_total, Money::from_major(4100));
    }

    #[test]
    fn test_happy_hour_with_welcome_coupon() {
        let items = [item(6, 2500, Category::Fashion, 1)];
        let result = evaluate(&items, "WELCOME15", 19);

        let amounts: Vec<_> = result.lines.iter().map(|l| l.amount).collect();
        assert_eq!(amounts, [Money::from_major(125), Money::from_major(375)]);
        assert_eq!(result.total_discount, Money::from_major(500));
        assert_eq!(result.final_total, Money::from_major(2000));
    }

    #[test]
    fn test_lowercase_coupon_is_normalized() {
        let items = [item(5, 1000, Category::Fashion, 1)];
        let result = evaluate(&items, "save10", 10);

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].label, "Coupon SAVE10 (10% off cart)");
        assert_eq!(result.total_discount, Money::from_major(100));
        assert_eq!(result.final_total, Money::from_major(900));
    }

    #[test]
    fn test_short_coupon_is_informational_only() {
        let items = [item(5, 1000, Category::Fashion, 1)];
        let result = evaluate(&items, "AB", 10);

        assert_eq!(result.lines.len(), 1);
        assert!(result.lines[0].is_informational());
        assert_eq!(result.applied_lines().count(), 0);
        assert_eq!(result.total_discount, Money::zero());
        assert_eq!(result.final_total, Money::from_major(1000));
    }

    #[test]
    fn test_cap_line_records_removed_amount() {
        // bulk at 22% + electronics 8% + happy hour 5% + SAVE10 10% = 45% of 10000
        let mut policy = DiscountPolicy::default();
        policy.bulk.rate = Rate::from_bps(2200);
        let engine = DiscountEngine::try_from_policy(&policy).unwrap();

        let items = [item(4, 2000, Category::Electronics, 5)];
        let result = engine.evaluate(&items, subtotal(&items), "SAVE10", at(20));

        assert_eq!(result.raw_discount, Money::from_major(4500));
        assert_eq!(result.applied_lines().count(), 4);
        let cap = result.lines.last().unwrap();
        assert!(cap.is_cap_note);
        assert_eq!(cap.label, "Discount Cap Applied (Max 35%)");
        assert_eq!(cap.amount, Money::from_major(1000));
        assert_eq!(result.total_discount, Money::from_major(3500));
        assert_eq!(result.final_total, Money::from_major(6500));
    }

    #[test]
    fn test_default_rules_can_reach_the_cap() {
        // 10% bulk + 8% electronics + 5% happy hour + 15% WELCOME15 = 38%
        let items = [item(4, 2000, Category::Electronics, 5)];
        let result = evaluate(&items, "WELCOME15", 21);

        assert!(result.cap_applied());
        assert_eq!(result.raw_discount, Money::from_major(3800));
        assert_eq!(result.lines.last().unwrap().amount, Money::from_major(300));
        assert_eq!(result.total_discount, Money::from_major(3500));
        assert_eq!(result.final_total, Money::from_major(6500));
    }

    #[test]
    fn test_raw_exactly_at_cap_adds_no_line() {
        let mut policy = DiscountPolicy::default();
        policy.cap_rate = Rate::from_bps(1800);
        let engine = DiscountEngine::from_policy(&policy);

        let items = [item(1, 1000, Category::Electronics, 5)];
        let result = engine.evaluate(&items, subtotal(&items), "", at(10));
        assert_eq!(result.raw_discount, Money::from_major(900));
        assert!(!result.cap_applied());
        assert_eq!(result.total_discount, Money::from_major(900));
    }

    #[test]
    fn test_empty_cart() {
        let result = evaluate(&[], "", 19);
        assert!(result.lines.is_empty());
        assert_eq!(result.total_discount, Money::zero());
        assert_eq!(result.final_total, Money::zero());

        let result = evaluate(&[], "NOPE1", 19);
        assert_eq!(result.lines.len(), 1);
        assert!(result.lines[0].is_informational());
        assert!(!result.cap_applied());
    }

    #[test]
    fn test_full_precision_is_kept() {
        // 5% of 1499 × 1 at happy hour = 74.95, not 75
        let items = [item(3, 1499, Category::Electronics, 1)];
        let result = evaluate(&items, "", 18);
        assert_eq!(result.total_discount.amount(), dec!(74.95));
        assert_eq!(result.final_total.amount(), dec!(1424.05));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let engine = DiscountEngine::default();
        let items = [
            item(2, 620, Category::Grocery, 6),
            item(4, 2499, Category::Electronics, 2),
        ];
        let first = engine.evaluate(&items, subtotal(&items), "FOOD5", at(20));
        let second = engine.evaluate(&items, subtotal(&items), "FOOD5", at(20));
        assert_eq!(first, second);
    }

    #[test]
    fn test_invariants_hold_across_inputs() {
        let engine = DiscountEngine::default();
        let carts: Vec<Vec<LineItem>> = vec![
            vec![],
            vec![item(1, 55, Category::Grocery, 1)],
            vec![item(2, 620, Category::Grocery, 9), item(8, 149, Category::Stationery, 5)],
            vec![item(3, 1499, Category::Electronics, 7), item(4, 2499, Category::Electronics, 5)],
            vec![
                item(2, 620, Category::Grocery, 20),
                item(4, 2499, Category::Electronics, 10),
                item(6, 1199, Category::Fashion, 5),
            ],
        ];
        let coupons = ["", "   ", "AB", "save10", "FOOD5", "WELCOME15", "UNKNOWN1", "BAD-CODE"];

        for items in &carts {
            let sub = subtotal(items);
            let floor = sub.percent(Rate::from_bps(6500));
            for coupon in coupons {
                for hour in [0, 12, 18, 21, 22] {
                    let r = engine.evaluate(items, sub, coupon, at(hour));

                    assert_eq!(r.final_total, (sub - r.total_discount).non_negative());
                    assert!(r.total_discount <= sub.percent(engine.cap_rate()));
                    assert!(r.final_total >= floor);
                    assert!(r.lines.iter().all(|l| !l.amount.is_negative()));
                    assert!(r.lines.iter().filter(|l| l.is_cap_note).count() <= 1);

                    if coupon.trim().is_empty() {
                        assert!(r.lines.iter().all(|l| l.source != DiscountSource::Coupon));
                    }
                }
            }
        }
    }

    // =========================================================================
    // Generated carts
    // =========================================================================

    fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec(
            (
                0i64..=10_000_000,
                1u32..=99,
                prop::sample::select(Category::ALL.to_vec()),
            ),
            0..8,
        )
        .prop_map(|lines| {
            lines
                .into_iter()
                .enumerate()
                .map(|(i, (cents, quantity, category))| LineItem {
                    id: i as u32 + 1,
                    name: format!("Item {}", i + 1),
                    price: Money::from_decimal(Decimal::new(cents, 2)),
                    category,
                    quantity,
                })
                .collect()
        })
    }

    fn arb_coupon() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[ \t\n]{1,4}",
            prop::sample::select(vec!["SAVE10", "save10", " FOOD5 ", "WELCOME15"])
                .prop_map(String::from),
            "[A-Za-z0-9 -]{0,14}",
            any::<String>(),
        ]
    }

    proptest! {
        #[test]
        fn evaluation_invariants_hold_for_generated_carts(
            items in arb_items(),
            hour in 0u32..24,
            coupon in arb_coupon(),
            bulk_bps in 0u32..=10_000,
        ) {
            let mut policy = DiscountPolicy::default();
            policy.bulk.rate = Rate::from_bps(bulk_bps);
            let engine = DiscountEngine::try_from_policy(&policy).unwrap();

            let sub = subtotal(&items);
            let r = engine.evaluate(&items, sub, &coupon, at(hour));
            let cap = sub.percent(engine.cap_rate());

            prop_assert_eq!(r.final_total, (sub - r.total_discount).non_negative());
            prop_assert!(r.total_discount <= cap);
            prop_assert!(r.final_total >= sub.percent(Rate::from_bps(6500)));
            prop_assert_eq!(r.total_discount, if r.raw_discount > cap { cap } else { r.raw_discount });
            prop_assert!(r.lines.iter().all(|l| !l.amount.is_negative()));
            prop_assert!(r.lines.iter().filter(|l| l.is_cap_note).count() <= 1);
            prop_assert_eq!(r.cap_applied(), r.raw_discount > cap);

            if coupon.trim().is_empty() {
                prop_assert!(r.lines.iter().all(|l| l.source != DiscountSource::Coupon));
            }

            let again = engine.evaluate(&items, sub, &coupon, at(hour));
            prop_assert_eq!(again, r);
        }
    }
}
