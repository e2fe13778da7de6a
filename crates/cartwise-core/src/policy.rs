//! # Discount Policy
//!
//! Every threshold, percentage and coupon the discount rules use.
//!
//! ## Defaults
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rule          Condition                         Discount               │
//! │  ────────────  ───────────────────────────────   ─────────────────────  │
//! │  Bulk          item qty ≥ 5                      10% of that item       │
//! │  Electronics   electronics subtotal ≥ 3000       8% of electronics      │
//! │  Grocery       grocery subtotal ≥ 1000           5% of grocery          │
//! │  Happy hour    local hour in 18..=21             5% of cart             │
//! │  SAVE10        -                                 10% of cart            │
//! │  FOOD5         -                                 5% of grocery          │
//! │  WELCOME15     subtotal ≥ 2000                   15% of cart            │
//! │  Cap           -                                 total ≤ 35% of cart    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The policy is plain data so it can come from a config file. Load it,
//! call [`DiscountPolicy::validate`], then hand it to
//! [`crate::engine::DiscountEngine::from_policy`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::coupon::{CouponFormat, CouponOffer, CouponTerms};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Category, Rate};

// =============================================================================
// Rule Settings
// =============================================================================

/// Bulk discount: a share of every line whose quantity reaches the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkPolicy {
    #[serde(default = "default_bulk_min_quantity")]
    pub min_quantity: u32,
    #[serde(default = "default_bulk_rate")]
    pub rate: Rate,
}

fn default_bulk_min_quantity() -> u32 {
    5
}

fn default_bulk_rate() -> Rate {
    Rate::from_bps(1000)
}

impl Default for BulkPolicy {
    fn default() -> Self {
        BulkPolicy {
            min_quantity: default_bulk_min_quantity(),
            rate: default_bulk_rate(),
        }
    }
}

/// Category discount: a share of one category's subtotal once it reaches
/// `min_subtotal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryThreshold {
    pub category: Category,
    pub min_subtotal: Money,
    pub rate: Rate,
}

fn default_category_thresholds() -> Vec<CategoryThreshold> {
    vec![
        CategoryThreshold {
            category: Category::Electronics,
            min_subtotal: Money::from_major(3000),
            rate: Rate::from_bps(800),
        },
        CategoryThreshold {
            category: Category::Grocery,
            min_subtotal: Money::from_major(1000),
            rate: Rate::from_bps(500),
        },
    ]
}

/// Happy hour: a share of the cart while the local hour is inside
/// `start_hour..=end_hour`.
///
/// Both bounds are whole hours, so the default 18..=21 covers
/// 18:00 through 21:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HappyHourPolicy {
    #[serde(default = "default_happy_start")]
    pub start_hour: u32,
    #[serde(default = "default_happy_end")]
    pub end_hour: u32,
    #[serde(default = "default_happy_rate")]
    pub rate: Rate,
}

fn default_happy_start() -> u32 {
    18
}

fn default_happy_end() -> u32 {
    21
}

fn default_happy_rate() -> Rate {
    Rate::from_bps(500)
}

impl Default for HappyHourPolicy {
    fn default() -> Self {
        HappyHourPolicy {
            start_hour: default_happy_start(),
            end_hour: default_happy_end(),
            rate: default_happy_rate(),
        }
    }
}

impl HappyHourPolicy {
    /// True if `hour` (0-23) falls inside the window.
    #[inline]
    pub fn contains(&self, hour: u32) -> bool {
        (self.start_hour..=self.end_hour).contains(&hour)
    }
}

// =============================================================================
// Discount Policy
// =============================================================================

/// Complete discount configuration.
///
/// ## Example Config (TOML)
/// ```toml
/// cap_rate = 3500
/// currency_symbol = "₹"
///
/// [bulk]
/// min_quantity = 5
/// rate = 1000
///
/// [happy_hour]
/// start_hour = 18
/// end_hour = 21
/// rate = 500
///
/// [[categories]]
/// category = "Electronics"
/// min_subtotal = 3000
/// rate = 800
///
/// [[coupons]]
/// code = "SAVE10"
/// type = "cart_percent"
/// rate = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    /// Maximum total discount as a share of the subtotal.
    #[serde(default = "default_cap_rate")]
    pub cap_rate: Rate,

    /// Symbol used inside discount labels ("over ₹3000").
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub bulk: BulkPolicy,

    /// Evaluated in list order; each entry produces its own line.
    #[serde(default = "default_category_thresholds")]
    pub categories: Vec<CategoryThreshold>,

    #[serde(default)]
    pub happy_hour: HappyHourPolicy,

    #[serde(default)]
    pub coupon_format: CouponFormat,

    #[serde(default = "CouponOffer::standard_offers")]
    pub coupons: Vec<CouponOffer>,
}

fn default_cap_rate() -> Rate {
    Rate::from_bps(3500)
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        DiscountPolicy {
            cap_rate: default_cap_rate(),
            currency_symbol: default_currency_symbol(),
            bulk: BulkPolicy::default(),
            categories: default_category_thresholds(),
            happy_hour: HappyHourPolicy::default(),
            coupon_format: CouponFormat::default(),
            coupons: CouponOffer::standard_offers(),
        }
    }
}

impl DiscountPolicy {
    /// Parses a JSON policy document and validates it.
    ///
    /// Missing fields take their defaults, so `{}` is the standard policy.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let policy: DiscountPolicy = serde_json::from_str(json)
            .map_err(|e| CoreError::invalid_policy(format!("malformed policy: {}", e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Checks that the policy is internally consistent.
    ///
    /// ## Rules
    /// - Every rate is at most 100%
    /// - Bulk minimum quantity is at least 1
    /// - Happy hour bounds are 0-23 and not reversed
    /// - Coupon format allows at least one length
    /// - Coupon codes are unique and pass the coupon format themselves
    /// - Each category has at most one threshold, none negative
    pub fn validate(&self) -> CoreResult<()> {
        check_rate("cap_rate", self.cap_rate)?;
        check_rate("bulk.rate", self.bulk.rate)?;
        check_rate("happy_hour.rate", self.happy_hour.rate)?;

        if self.bulk.min_quantity == 0 {
            return Err(CoreError::invalid_policy("bulk.min_quantity must be at least 1"));
        }

        let hh = &self.happy_hour;
        if hh.start_hour > 23 || hh.end_hour > 23 {
            return Err(CoreError::invalid_policy("happy_hour hours must be between 0 and 23"));
        }
        if hh.start_hour > hh.end_hour {
            return Err(CoreError::invalid_policy(format!(
                "happy_hour start_hour {} is after end_hour {}",
                hh.start_hour, hh.end_hour
            )));
        }

        let fmt = &self.coupon_format;
        if fmt.min_len == 0 || fmt.min_len > fmt.max_len {
            return Err(CoreError::invalid_policy(format!(
                "coupon_format must satisfy 1 <= min_len <= max_len, got {}..={}",
                fmt.min_len, fmt.max_len
            )));
        }

        let mut seen_categories = HashSet::new();
        for threshold in &self.categories {
            if !seen_categories.insert(threshold.category) {
                return Err(CoreError::invalid_policy(format!(
                    "category {} has more than one threshold",
                    threshold.category
                )));
            }
            if threshold.min_subtotal.is_negative() {
                return Err(CoreError::invalid_policy(format!(
                    "category {} min_subtotal is negative",
                    threshold.category
                )));
            }
            check_rate("categories.rate", threshold.rate)?;
        }

        let mut seen_codes = HashSet::new();
        for offer in &self.coupons {
            fmt.check(&offer.code).map_err(|e| {
                CoreError::invalid_policy(format!("coupon '{}' is not a valid code: {}", offer.code, e))
            })?;
            if !seen_codes.insert(offer.code.as_str()) {
                return Err(CoreError::invalid_policy(format!(
                    "coupon '{}' is defined more than once",
                    offer.code
                )));
            }
            let rate = match &offer.terms {
                CouponTerms::CartPercent { rate } => *rate,
                CouponTerms::CategoryPercent { rate, .. } => *rate,
                CouponTerms::CartPercentWithMinimum { rate, min_subtotal } => {
                    if min_subtotal.is_negative() {
                        return Err(CoreError::invalid_policy(format!(
                            "coupon '{}' min_subtotal is negative",
                            offer.code
                        )));
                    }
                    *rate
                }
            };
            check_rate("coupons.rate", rate)?;
        }

        Ok(())
    }
}

fn check_rate(field: &str, rate: Rate) -> CoreResult<()> {
    if rate > Rate::FULL {
        return Err(CoreError::invalid_policy(format!(
            "{} is {} but cannot exceed 100%",
            field, rate
        )));
    }
    Ok(())
}
