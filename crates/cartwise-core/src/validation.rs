//! # Validation Module
//!
//! Input validation utilities for Cartwise.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Rendering layer                                              │
//! │  ├── Number inputs with min/max                                        │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart operations (THIS MODULE)                                │
//! │  ├── Quantity clamping / range checks                                  │
//! │  ├── Price and name checks for new line items                          │
//! │  └── Coupon structure                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Discount engine                                              │
//! │  └── Assumes pre-validated carts; never rejects input                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::validation::{validate_coupon_structure, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_coupon_structure("SAVE10", 4, 12).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates the structure of an already-normalized coupon code.
///
/// ## Rules
/// - Length between `min_len` and `max_len` characters (inclusive)
/// - Only `A-Z` and `0-9`
///
/// Lowercase letters are rejected here: callers normalize first.
///
/// ## Example
/// ```rust
/// use cartwise_core::validation::validate_coupon_structure;
///
/// assert!(validate_coupon_structure("FOOD5", 4, 12).is_ok());
/// assert!(validate_coupon_structure("AB", 4, 12).is_err());
/// assert!(validate_coupon_structure("SAVE-10", 4, 12).is_err());
/// ```
pub fn validate_coupon_structure(code: &str, min_len: usize, max_len: usize) -> ValidationResult<()> {
    let len = code.chars().count();

    if len < min_len {
        return Err(ValidationError::TooShort {
            field: "coupon".to_string(),
            min: min_len,
        });
    }

    if len > max_len {
        return Err(ValidationError::TooLong {
            field: "coupon".to_string(),
            max: max_len,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "coupon".to_string(),
            reason: "only A-Z and 0-9 are allowed".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (99)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < MIN_ITEM_QUANTITY {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Forces a requested quantity into the allowed range.
///
/// The quantity box in the cart never rejects input: anything below 1
/// becomes 1 and anything above 99 becomes 99.
///
/// ## User Workflow
/// ```text
/// User types "0" ──► clamp_quantity(0)   ──► 1
/// User types "7" ──► clamp_quantity(7)   ──► 7
/// User types "500" ► clamp_quantity(500) ──► 99
/// ```
pub fn clamp_quantity(requested: i64) -> u32 {
    // Both bounds fit in u32.
    requested.clamp(MIN_ITEM_QUANTITY, MAX_ITEM_QUANTITY) as u32
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
