//! # Error Types
//!
//! Domain-specific error types for cartwise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartwise-core errors (this file)                                      │
//! │  ├── CoreError        - Cart and policy errors                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cartwise-checkout errors (separate crate)                             │
//! │  └── CheckoutError    - Config, session and checkout failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Discount evaluation itself never fails. A bad coupon is reported as a
//! zero-amount [`crate::types::DiscountLine`], not as an error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(u32),

    /// Cart operation referenced an item that is not in the cart.
    #[error("Product {0} not in cart")]
    ItemNotInCart(u32),

    /// Two cart lines or two catalog products share an id.
    #[error("Duplicate product id: {0}")]
    DuplicateItem(u32),

    /// Discount policy is inconsistent.
    ///
    /// ## When This Occurs
    /// - A rate above 100%
    /// - Happy hour window outside 0-23 or reversed
    /// - Coupon length bounds that no code can satisfy
    /// - The same coupon code defined twice
    #[error("Invalid discount policy: {reason}")]
    InvalidPolicy { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., coupon with punctuation).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand for [`CoreError::InvalidPolicy`].
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        CoreError::InvalidPolicy {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
