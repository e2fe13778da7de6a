//! # cartwise-checkout: Checkout Session Layer
//!
//! Wraps the pure `cartwise-core` engine with the state and side effects a
//! running checkout needs.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Startup                                  │
//! │                                                                         │
//! │  1. telemetry::init_tracing()       RUST_LOG or "info,cartwise=debug"  │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  2. CheckoutConfig::load_or_default()   file → CARTWISE_* → validate   │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  3. CheckoutSession::new(config, catalog, SystemClock)                 │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  4. spawn_refresh(session, config.refresh.interval())                  │
//! │        └──► watch::Receiver<CartSummary> feeds the UI                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use cartwise_checkout::{CheckoutConfig, CheckoutSession, FixedClock};
//! use cartwise_core::Catalog;
//! use chrono::NaiveDate;
//!
//! let evening = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(19, 30, 0).unwrap();
//! let session = CheckoutSession::new(
//!     &CheckoutConfig::default(),
//!     Catalog::default(),
//!     Arc::new(FixedClock::new(evening)),
//! )
//! .unwrap();
//!
//! session.add_product(3).unwrap(); // Headphones 1499
//! session.apply_coupon("save10");
//!
//! let summary = session.summary();
//! assert!(summary.clock.happy_hour);
//! // 5% happy hour + 10% SAVE10
//! assert_eq!(summary.view.total_text, "₹1274");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod refresh;
pub mod session;
pub mod telemetry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CheckoutConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use refresh::{spawn_refresh, RefreshHandle};
pub use session::{CartSummary, CheckoutSession, Receipt};
