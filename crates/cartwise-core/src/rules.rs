//! # Discount Rules
//!
//! Each rule looks at the same four inputs and returns zero or one
//! [`DiscountLine`]. Rules never see each other's output: every
//! percentage is taken from a gross subtotal, so the order of rules only
//! decides the order of the displayed lines.
//!
//! ```text
//!   RuleContext { items, subtotal, coupon_code, now }
//!        │
//!        ├──► Bulk ─────────► Option<DiscountLine>
//!        ├──► Category(E) ──► Option<DiscountLine>
//!        ├──► Category(G) ──► Option<DiscountLine>
//!        ├──► HappyHour ────► Option<DiscountLine>
//!        └──► Coupon ───────► Option<DiscountLine>
//! ```

use chrono::{NaiveDateTime, Timelike};

use crate::cart::category_subtotal;
use crate::coupon::{classify, CouponFormat, CouponOffer, CouponStatus, CouponTerms};
use crate::display::{format_money, hour_label};
use crate::money::Money;
use crate::policy::{BulkPolicy, CategoryThreshold, DiscountPolicy, HappyHourPolicy};
use crate::types::{DiscountLine, DiscountSource, LineItem};

/// The inputs every rule receives.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub items: &'a [LineItem],
    /// Gross subtotal as computed by the caller.
    pub subtotal: Money,
    /// Raw coupon text; rules normalize it themselves.
    pub coupon_code: &'a str,
    /// Local wall-clock time.
    pub now: NaiveDateTime,
}

// =============================================================================
// Rule Variants
// =============================================================================

/// Bulk rule: one combined line for every item with enough quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRule {
    pub policy: BulkPolicy,
}

/// Category rule: a share of one category once its subtotal is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub threshold: CategoryThreshold,
    pub currency_symbol: String,
}

/// Time-of-day rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HappyHourRule {
    pub window: HappyHourPolicy,
}

/// Coupon rule: format check, table lookup, then the offer's terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRule {
    pub format: CouponFormat,
    pub offers: Vec<CouponOffer>,
    pub currency_symbol: String,
}

/// One independent discount rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountRule {
    Bulk(BulkRule),
    Category(CategoryRule),
    HappyHour(HappyHourRule),
    Coupon(CouponRule),
}

impl DiscountRule {
    /// Builds the rule list for a policy in evaluation order:
    /// bulk, each category threshold, happy hour, coupon.
    pub fn from_policy(policy: &DiscountPolicy) -> Vec<DiscountRule> {
        let symbol = &policy.currency_symbol;

        let mut rules = Vec::with_capacity(policy.categories.len() + 3);
        rules.push(DiscountRule::Bulk(BulkRule {
            policy: policy.bulk,
        }));
        rules.extend(policy.categories.iter().map(|t| {
            DiscountRule::Category(CategoryRule {
                threshold: t.clone(),
                currency_symbol: symbol.clone(),
            })
        }));
        rules.push(DiscountRule::HappyHour(HappyHourRule {
            window: policy.happy_hour,
        }));
        rules.push(DiscountRule::Coupon(CouponRule {
            format: policy.coupon_format,
            offers: policy.coupons.clone(),
            currency_symbol: symbol.clone(),
        }));
        rules
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DiscountRule::Bulk(_) => "bulk",
            DiscountRule::Category(_) => "category",
            DiscountRule::HappyHour(_) => "happy_hour",
            DiscountRule::Coupon(_) => "coupon",
        }
    }

    /// Evaluates the rule.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DiscountLine> {
        match self {
            DiscountRule::Bulk(rule) => rule.evaluate(ctx),
            DiscountRule::Category(rule) => rule.evaluate(ctx),
            DiscountRule::HappyHour(rule) => rule.evaluate(ctx),
            DiscountRule::Coupon(rule) => rule.evaluate(ctx),
        }
    }
}

impl BulkRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DiscountLine> {
        let BulkPolicy { min_quantity, rate } = self.policy;

        let amount: Money = ctx
            .items
            .iter()
            .filter(|i| i.quantity >= min_quantity)
            .map(|i| i.line_total().percent(rate))
            .sum();

        amount.is_positive().then(|| {
            DiscountLine::savings(
                DiscountSource::Bulk,
                format!("Bulk Discount ({}% on qty ≥ {})", rate.percent_label(), min_quantity),
                amount,
            )
        })
    }
}

impl CategoryRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DiscountLine> {
        let CategoryThreshold {
            category,
            min_subtotal,
            rate,
        } = &self.threshold;

        let base = category_subtotal(ctx.items, *category);
        if !base.is_positive() || base < *min_subtotal {
            return None;
        }

        Some(DiscountLine::savings(
            DiscountSource::Category(*category),
            format!(
                "{} Discount ({}% over {})",
                category,
                rate.percent_label(),
                format_money(*min_subtotal, &self.currency_symbol)
            ),
            base.percent(*rate),
        ))
    }
}

impl HappyHourRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DiscountLine> {
        if !self.window.contains(ctx.now.hour()) || !ctx.subtotal.is_positive() {
            return None;
        }

        Some(DiscountLine::savings(
            DiscountSource::HappyHour,
            format!(
                "Happy Hours Discount ({}% {}-{})",
                self.window.rate.percent_label(),
                hour_label(self.window.start_hour),
                hour_label(self.window.end_hour)
            ),
            ctx.subtotal.percent(self.window.rate),
        ))
    }
}

impl CouponRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<DiscountLine> {
        match classify(ctx.coupon_code, &self.format, &self.offers) {
            CouponStatus::None => None,
            CouponStatus::InvalidFormat(_) => Some(DiscountLine::notice(
                DiscountSource::Coupon,
                "Invalid coupon format (A-Z0-9 only)",
            )),
            CouponStatus::Unrecognized(code) => Some(DiscountLine::notice(
                DiscountSource::Coupon,
                format!("Coupon \"{}\" not recognized", code),
            )),
            CouponStatus::Recognized(offer) => Some(self.apply(offer, ctx)),
        }
    }

    fn apply(&self, offer: &CouponOffer, ctx: &RuleContext<'_>) -> DiscountLine {
        let code = &offer.code;
        match &offer.terms {
            CouponTerms::CartPercent { rate } => DiscountLine::savings(
                DiscountSource::Coupon,
                format!("Coupon {} ({}% off cart)", code, rate.percent_label()),
                ctx.subtotal.percent(*rate),
            ),
            CouponTerms::CategoryPercent { category, rate } => DiscountLine::savings(
                DiscountSource::Coupon,
                format!("Coupon {} ({}% off {})", code, rate.percent_label(), category),
                category_subtotal(ctx.items, *category).percent(*rate),
            ),
            CouponTerms::CartPercentWithMinimum { rate, min_subtotal } => {
                if ctx.subtotal >= *min_subtotal {
                    DiscountLine::savings(
                        DiscountSource::Coupon,
                        format!("Coupon {} ({}% off cart)", code, rate.percent_label()),
                        ctx.subtotal.percent(*rate),
                    )
                } else {
                    DiscountLine::notice(
                        DiscountSource::Coupon,
                        format!(
                            "{} (needs subtotal ≥ {})",
                            code,
                            format_money(*min_subtotal, &self.currency_symbol)
                        ),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
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

    fn rules() -> Vec<DiscountRule> {
        DiscountRule::from_policy(&DiscountPolicy::default())
    }

    fn rule(name: &str) -> DiscountRule {
        rules().into_iter().find(|r| r.name() == name).unwrap()
    }

    fn ctx<'a>(items: &'a [LineItem], coupon: &'a str, now: NaiveDateTime) -> RuleContext<'a> {
        RuleContext {
            items,
            subtotal: crate::cart::subtotal(items),
            coupon_code: coupon,
            now,
        }
    }

    #[test]
    fn test_rule_order_follows_policy() {
        let names: Vec<_> = rules().iter().map(DiscountRule::name).collect();
        assert_eq!(names, ["bulk", "category", "category", "happy_hour", "coupon"]);
    }

    #[test]
    fn test_bulk_sums_only_qualifying_items() {
        let items = [
            item(1, 55, Category::Grocery, 5),   // 275 → 27.5
            item(7, 199, Category::Stationery, 4), // below threshold
            item(8, 149, Category::Stationery, 6), // 894 → 89.4
        ];
        let line = rule("bulk").evaluate(&ctx(&items, "", at(10, 0))).unwrap();
        assert_eq!(line.amount.amount(), dec!(116.9));
        assert_eq!(line.label, "Bulk Discount (10% on qty ≥ 5)");
        assert_eq!(line.source, DiscountSource::Bulk);
    }

    #[test]
    fn test_bulk_absent_below_threshold() {
        let items = [item(1, 55, Category::Grocery, 4)];
        assert!(rule("bulk").evaluate(&ctx(&items, "", at(10, 0))).is_none());
    }

    #[test]
    fn test_category_threshold_is_inclusive() {
        let rules = rules();
        let electronics = &rules[1];

        let exactly = [item(3, 1500, Category::Electronics, 2)];
        let line = electronics.evaluate(&ctx(&exactly, "", at(10, 0))).unwrap();
        assert_eq!(line.amount, Money::from_major(240));
        assert_eq!(line.label, "Electronics Discount (8% over ₹3000)");

        let below = [item(3, 1499, Category::Electronics, 2)];
        assert!(electronics.evaluate(&ctx(&below, "", at(10, 0))).is_none());
    }

    #[test]
    fn test_category_uses_only_its_category() {
        let rules = rules();
        let grocery = &rules[2];
        let items = [
            item(2, 620, Category::Grocery, 1),
            item(4, 2499, Category::Electronics, 1),
        ];
        // Cart is 3119 but grocery alone is 620
        assert!(grocery.evaluate(&ctx(&items, "", at(10, 0))).is_none());
    }

    #[test]
    fn test_happy_hour_window() {
        let items = [item(5, 499, Category::Fashion, 2)];
        let happy = rule("happy_hour");

        assert!(happy.evaluate(&ctx(&items, "", at(17, 59))).is_none());
        let line = happy.evaluate(&ctx(&items, "", at(18, 0))).unwrap();
        assert_eq!(line.amount.amount(), dec!(49.9));
        assert_eq!(line.label, "Happy Hours Discount (5% 6PM-9PM)");
        assert!(happy.evaluate(&ctx(&items, "", at(21, 59))).is_some());
        assert!(happy.evaluate(&ctx(&items, "", at(22, 0))).is_none());
    }

    #[test]
    fn test_happy_hour_needs_positive_subtotal() {
        assert!(rule("happy_hour").evaluate(&ctx(&[], "", at(19, 0))).is_none());
    }

    #[test]
    fn test_coupon_lines() {
        let items = [item(2, 620, Category::Grocery, 2), item(6, 1199, Category::Fashion, 1)];
        let coupon = rule("coupon");
        let eval = |code: &str| coupon.evaluate(&ctx(&items, code, at(10, 0)));

        assert!(eval("").is_none());

        let save = eval("save10").unwrap();
        assert_eq!(save.amount.amount(), dec!(243.9));
        assert_eq!(save.label, "Coupon SAVE10 (10% off cart)");

        let food = eval("FOOD5").unwrap();
        assert_eq!(food.amount, Money::from_major(62));
        assert_eq!(food.label, "Coupon FOOD5 (5% off Grocery)");

        // Subtotal 2439 ≥ 2000
        let welcome = eval("WELCOME15").unwrap();
        assert_eq!(welcome.amount.amount(), dec!(365.85));

        let unknown = eval("SPRING24").unwrap();
        assert!(unknown.is_informational());
        assert_eq!(unknown.label, "Coupon \"SPRING24\" not recognized");

        let invalid = eval("AB").unwrap();
        assert!(invalid.is_informational());
        assert_eq!(invalid.label, "Invalid coupon format (A-Z0-9 only)");
    }

    #[test]
    fn test_welcome_coupon_below_minimum_is_notice() {
        let items = [item(6, 1199, Category::Fashion, 1)];
        let line = rule("coupon")
            .evaluate(&ctx(&items, "WELCOME15", at(10, 0)))
            .unwrap();
        assert!(line.is_informational());
        assert_eq!(line.label, "WELCOME15 (needs subtotal ≥ ₹2000)");
    }

    #[test]
    fn test_rules_use_caller_subtotal() {
        // The engine contract passes subtotal explicitly; cart-wide rules use it as given
        let items = [item(5, 499, Category::Fashion, 1)];
        let context = RuleContext {
            items: &items,
            subtotal: Money::from_major(1000),
            coupon_code: "SAVE10",
            now: at(10, 0),
        };
        let line = rule("coupon").evaluate(&context).unwrap();
        assert_eq!(line.amount, Money::from_major(100));
    }
}
