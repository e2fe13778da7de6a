//! # Display Helpers
//!
//! Everything here rounds or formats. The discount engine keeps full
//! precision; these functions are applied afterwards, by whoever renders
//! the result.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::policy::HappyHourPolicy;
use crate::types::DiscountResult;

/// Formats an amount in whole currency units: `₹1235`, `-₹5`.
///
/// ## Example
/// ```rust
/// use cartwise_core::display::format_money;
/// use cartwise_core::money::Money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Money::from_decimal(Decimal::new(12345, 1)), "₹"), "₹1235");
/// ```
pub fn format_money(amount: Money, symbol: &str) -> String {
    let rounded = amount.round_whole().amount();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{}", symbol, rounded.abs())
    } else {
        format!("{}{}", symbol, rounded.abs())
    }
}

/// 12-hour clock label for a whole hour: 0 → `12AM`, 18 → `6PM`.
pub fn hour_label(hour: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let h = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}{}", h, suffix)
}

// =============================================================================
// Discount Summary
// =============================================================================

/// How a summary row should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineTone {
    /// A discount (or an informational coupon row).
    Savings,
    /// The cap adjustment.
    CapNote,
}

/// One formatted row of the discount breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub label: String,
    /// Signed, rounded text such as `- ₹500`.
    pub amount_text: String,
    pub tone: LineTone,
}

/// The rendered form of a [`DiscountResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub rows: Vec<SummaryRow>,
    pub subtotal_text: String,
    pub total_text: String,
}

impl SummaryView {
    /// Formats a result for display.
    ///
    /// An empty breakdown becomes a single "No discounts applied" row.
    pub fn build(result: &DiscountResult, symbol: &str) -> Self {
        let rows = if result.lines.is_empty() {
            vec![SummaryRow {
                label: "No discounts applied".to_string(),
                amount_text: format_money(Money::zero(), symbol),
                tone: LineTone::Savings,
            }]
        } else {
            result
                .lines
                .iter()
                .map(|line| SummaryRow {
                    label: line.label.clone(),
                    amount_text: format!("- {}", format_money(line.amount, symbol)),
                    tone: if line.is_cap_note {
                        LineTone::CapNote
                    } else {
                        LineTone::Savings
                    },
                })
                .collect()
        };

        SummaryView {
            rows,
            subtotal_text: format_money(result.subtotal, symbol),
            total_text: format_money(result.final_total, symbol),
        }
    }
}

// =============================================================================
// Clock Status
// =============================================================================

/// The time chip next to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClockStatus {
    pub happy_hour: bool,
    /// `Happy Hours (19:05)` or `Current Time 10:05`.
    pub text: String,
    /// Full weekday name, e.g. `Thursday`.
    pub weekday: String,
}

impl ClockStatus {
    pub fn at(now: NaiveDateTime, window: &HappyHourPolicy) -> Self {
        let time = format!("{}:{:02}", now.hour(), now.minute());
        let happy_hour = window.contains(now.hour());
        let text = if happy_hour {
            format!("Happy Hours ({})", time)
        } else {
            format!("Current Time {}", time)
        };

        ClockStatus {
            happy_hour,
            text,
            weekday: now.format("%A").to_string(),
        }
    }
}
