//! # Coupons
//!
//! Coupon codes go through two separate steps:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. ENTRY (Apply button)             2. EVALUATION (every recompute)    │
//! │  ─────────────────────────           ───────────────────────────────    │
//! │  CouponEntry::parse(input)           classify(code, format, offers)     │
//! │   • strip whitespace                  • trim + uppercase                │
//! │   • uppercase                         • length / charset check          │
//! │   • empty → Cleared                   • lookup in the coupon table      │
//! │   • no leading A-Z → Rejected                                           │
//! │   • else → Applied(code) ───────────► code stored, re-checked here     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entry is lenient: `"SAVE 10"` is stored as `SAVE10`. Evaluation never
//! fails; it only decides which line the coupon contributes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Category, Rate};
use crate::validation::validate_coupon_structure;

// =============================================================================
// Coupon Table
// =============================================================================

/// What a coupon gives once its code is recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CouponTerms {
    /// A percentage of the whole cart subtotal.
    CartPercent { rate: Rate },

    /// A percentage of one category's subtotal.
    CategoryPercent { category: Category, rate: Rate },

    /// A percentage of the cart subtotal, only when the subtotal reaches
    /// `min_subtotal`. Below it the coupon shows a zero-amount notice.
    CartPercentWithMinimum { rate: Rate, min_subtotal: Money },
}

/// A recognized coupon code and its terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponOffer {
    /// Normalized code (uppercase, no whitespace).
    pub code: String,
    #[serde(flatten)]
    pub terms: CouponTerms,
}

impl CouponOffer {
    pub fn new(code: impl Into<String>, terms: CouponTerms) -> Self {
        CouponOffer {
            code: code.into(),
            terms,
        }
    }

    /// The standard coupon table: SAVE10, FOOD5, WELCOME15.
    pub fn standard_offers() -> Vec<CouponOffer> {
        vec![
            CouponOffer::new(
                "SAVE10",
                CouponTerms::CartPercent {
                    rate: Rate::from_bps(1000),
                },
            ),
            CouponOffer::new(
                "FOOD5",
                CouponTerms::CategoryPercent {
                    category: Category::Grocery,
                    rate: Rate::from_bps(500),
                },
            ),
            CouponOffer::new(
                "WELCOME15",
                CouponTerms::CartPercentWithMinimum {
                    rate: Rate::from_bps(1500),
                    min_subtotal: Money::from_major(2000),
                },
            ),
        ]
    }
}

// =============================================================================
// Coupon Format
// =============================================================================

/// Structural rules every coupon code must meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponFormat {
    #[serde(default = "default_min_len")]
    pub min_len: usize,
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

fn default_min_len() -> usize {
    4
}

fn default_max_len() -> usize {
    12
}

impl Default for CouponFormat {
    fn default() -> Self {
        CouponFormat {
            min_len: default_min_len(),
            max_len: default_max_len(),
        }
    }
}

impl CouponFormat {
    /// Checks an already-normalized code.
    pub fn check(&self, code: &str) -> Result<(), ValidationError> {
        validate_coupon_structure(code, self.min_len, self.max_len)
    }
}

// =============================================================================
// Evaluation-side classification
// =============================================================================

/// Normalizes a code for evaluation: trim, then uppercase.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// What the coupon rule found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponStatus<'a> {
    /// No code (empty or whitespace only). Contributes no line.
    None,

    /// Non-empty code that breaks the length/charset rules.
    InvalidFormat(ValidationError),

    /// Well-formed code that is not in the table.
    Unrecognized(String),

    /// Code found in the table.
    Recognized(&'a CouponOffer),
}

/// Classifies a raw code against the format rules and the coupon table.
///
/// ## Example
/// ```rust
/// use cartwise_core::coupon::{classify, CouponFormat, CouponOffer, CouponStatus};
///
/// let offers = CouponOffer::standard_offers();
/// let format = CouponFormat::default();
///
/// assert_eq!(classify("", &format, &offers), CouponStatus::None);
/// assert!(matches!(classify(" save10 ", &format, &offers), CouponStatus::Recognized(o) if o.code == "SAVE10"));
/// assert!(matches!(classify("AB", &format, &offers), CouponStatus::InvalidFormat(_)));
/// assert_eq!(classify("SPRING24", &format, &offers), CouponStatus::Unrecognized("SPRING24".into()));
/// ```
pub fn classify<'a>(raw: &str, format: &CouponFormat, offers: &'a [CouponOffer]) -> CouponStatus<'a> {
    let code = normalize_code(raw);
    if code.is_empty() {
        return CouponStatus::None;
    }

    if let Err(e) = format.check(&code) {
        return CouponStatus::InvalidFormat(e);
    }

    match offers.iter().find(|o| o.code == code) {
        Some(offer) => CouponStatus::Recognized(offer),
        None => CouponStatus::Unrecognized(code),
    }
}

// =============================================================================
// Entry-side parsing
// =============================================================================

/// Outcome of pressing "Apply" on the coupon field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum CouponEntry {
    /// Field was empty: any applied coupon is removed.
    Cleared,

    /// Code does not start with a letter: any applied coupon is removed.
    Rejected,

    /// Code stored for evaluation. It may still turn out unrecognized.
    Applied(String),
}

impl CouponEntry {
    /// Parses the text of the coupon field.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::coupon::CouponEntry;
    ///
    /// assert_eq!(CouponEntry::parse(" save 10 "), CouponEntry::Applied("SAVE10".into()));
    /// assert_eq!(CouponEntry::parse("   "), CouponEntry::Cleared);
    /// assert_eq!(CouponEntry::parse("10OFF"), CouponEntry::Rejected);
    /// ```
    pub fn parse(input: &str) -> Self {
        let code: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        match code.chars().next() {
            None => CouponEntry::Cleared,
            Some(first) if first.is_ascii_uppercase() => CouponEntry::Applied(code),
            Some(_) => CouponEntry::Rejected,
        }
    }

    /// The code to evaluate with; empty unless a code was applied.
    pub fn applied_code(&self) -> &str {
        match self {
            CouponEntry::Applied(code) => code,
            CouponEntry::Cleared | CouponEntry::Rejected => "",
        }
    }

    /// Message shown under the coupon field.
    pub fn message(&self) -> String {
        match self {
            CouponEntry::Cleared => "Coupon cleared.".to_string(),
            CouponEntry::Rejected => "Invalid coupon: must start with a letter.".to_string(),
            CouponEntry::Applied(code) => format!("Coupon \"{}\" applied (if valid).", code),
        }
    }
}
