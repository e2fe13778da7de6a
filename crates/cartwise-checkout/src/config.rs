//! # Checkout Configuration
//!
//! Store settings, the discount policy and the refresh period.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTWISE_CAP_BPS=3000                                              │
//! │     CARTWISE_HAPPY_HOUR_START=17                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cartwise/cartwise.toml (Linux)                           │
//! │     ~/Library/Application Support/com.cartwise.checkout/ (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     35% cap, 6PM-9PM happy hour, SAVE10 / FOOD5 / WELCOME15            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cartwise.toml
//! [store]
//! name = "Cartwise Demo Store"
//!
//! [refresh]
//! interval_secs = 30
//!
//! [discounts]
//! cap_rate = 3500
//! currency_symbol = "₹"
//!
//! [discounts.happy_hour]
//! start_hour = 18
//! end_hour = 21
//! rate = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use cartwise_core::policy::DiscountPolicy;
use cartwise_core::Rate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, CheckoutResult};

/// File name looked up inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "cartwise.toml";

// =============================================================================
// Store Settings
// =============================================================================

/// Shown on receipts and in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Cartwise Demo Store".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

// =============================================================================
// Refresh Settings
// =============================================================================

/// How often an open checkout re-evaluates its discounts.
///
/// Only the happy-hour rule depends on the clock, so this is the longest a
/// stale happy-hour line can stay on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    30
}

impl Default for RefreshSettings {
    fn default() -> Self {
        RefreshSettings {
            interval_secs: default_refresh_interval(),
        }
    }
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

// =============================================================================
// Main Checkout Configuration
// =============================================================================

/// Complete checkout configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    /// Thresholds, rates and the coupon table.
    #[serde(default)]
    pub discounts: DiscountPolicy,
}

impl CheckoutConfig {
    /// Loads configuration from a TOML file, then applies environment
    /// overrides and validates the result.
    pub fn load(path: impl AsRef<Path>) -> CheckoutResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading checkout config");

        let content = std::fs::read_to_string(path)?;
        let mut config: CheckoutConfig = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        info!(
            path = %path.display(),
            store = %config.store.name,
            coupons = config.discounts.coupons.len(),
            "Checkout config loaded"
        );
        Ok(config)
    }

    /// Loads from the default location, falling back to defaults if the
    /// file does not exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default() -> CheckoutResult<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                info!(path = %path.display(), "No config file found, using defaults");
                Self::from_env()
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Self::from_env()
            }
        }
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> CheckoutResult<Self> {
        let mut config = CheckoutConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> CheckoutResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CheckoutError::ConfigSaveFailed(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| CheckoutError::ConfigSaveFailed(e.to_string()))?;

        info!(path = %path.display(), "Checkout config saved");
        Ok(())
    }

    /// Applies `CARTWISE_*` environment variables.
    ///
    /// Values that do not parse are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Split out so tests do not have
    /// to touch the process environment.
    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bps) = parse_override::<u32>(&lookup, "CARTWISE_CAP_BPS") {
            self.discounts.cap_rate = Rate::from_bps(bps);
        }
        if let Some(hour) = parse_override::<u32>(&lookup, "CARTWISE_HAPPY_HOUR_START") {
            self.discounts.happy_hour.start_hour = hour;
        }
        if let Some(hour) = parse_override::<u32>(&lookup, "CARTWISE_HAPPY_HOUR_END") {
            self.discounts.happy_hour.end_hour = hour;
        }
        if let Some(symbol) = lookup("CARTWISE_CURRENCY_SYMBOL") {
            debug!(symbol = %symbol, "Currency symbol from environment");
            self.discounts.currency_symbol = symbol;
        }
        if let Some(secs) = parse_override::<u64>(&lookup, "CARTWISE_REFRESH_SECS") {
            self.refresh.interval_secs = secs;
        }
        if let Some(name) = lookup("CARTWISE_STORE_NAME") {
            debug!(name = %name, "Store name from environment");
            self.store.name = name;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(CheckoutError::InvalidConfig(
                "store.name cannot be empty".to_string(),
            ));
        }

        if self.refresh.interval_secs == 0 {
            return Err(CheckoutError::InvalidConfig(
                "refresh.interval_secs must be at least 1".to_string(),
            ));
        }

        if self.discounts.currency_symbol.is_empty() {
            return Err(CheckoutError::InvalidConfig(
                "discounts.currency_symbol cannot be empty".to_string(),
            ));
        }

        self.discounts.validate()?;
        Ok(())
    }
}

fn parse_override<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => {
            debug!(key, value = %raw, "Config override from environment");
            Some(value)
        }
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

/// `cartwise.toml` inside the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "cartwise", "checkout")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartwise_core::Category;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CheckoutConfig::default();
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.refresh.interval(), Duration::from_secs(30));
        assert_eq!(config.discounts.cap_rate.bps(), 3500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [store]
            name = "Corner Shop"

            [discounts.happy_hour]
            start_hour = 17
            end_hour = 20
        "#;

        let config: CheckoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.store.name, "Corner Shop");
        assert_eq!(config.refresh.interval_secs, 30);
        assert_eq!(config.discounts.happy_hour.start_hour, 17);
        assert_eq!(config.discounts.happy_hour.rate.bps(), 500);
        assert_eq!(config.discounts.coupons.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_coupon_table() {
        let toml = r#"
            [[discounts.coupons]]
            code = "TECH20"
            type = "category_percent"
            category = "Electronics"
            rate = 2000

            [[discounts.categories]]
            category = "Fashion"
            min_subtotal = 1500
            rate = 300
        "#;

        let config: CheckoutConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.discounts.coupons.len(), 1);
        assert_eq!(config.discounts.coupons[0].code, "TECH20");
        assert_eq!(config.discounts.categories.len(), 1);
        assert_eq!(config.discounts.categories[0].category, Category::Fashion);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = CheckoutConfig::default();
        config.store.name = "Round Trip Store".to_string();
        config.refresh.interval_secs = 45;
        config.save(&path).unwrap();

        let loaded = CheckoutConfig::load(&path).unwrap();
        assert_eq!(loaded.store.name, "Round Trip Store");
        assert_eq!(loaded.refresh.interval_secs, 45);
        assert_eq!(loaded.discounts, config.discounts);
    }

    #[test]
    fn test_load_missing_file() {
        let err = CheckoutConfig::load("/nonexistent/cartwise.toml").unwrap_err();
        assert!(matches!(err, CheckoutError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_load_rejects_invalid_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[discounts]\ncap_rate = 12000\n").unwrap();

        let err = CheckoutConfig::load(&path).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        CheckoutConfig::default()
            .save(root.join(CONFIG_FILE_NAME))
            .unwrap();

        drop(dir);
        assert!(!root.exists());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CheckoutConfig::default();
        config.apply_overrides(lookup_from(&[
            ("CARTWISE_CAP_BPS", "3000"),
            ("CARTWISE_HAPPY_HOUR_START", "17"),
            ("CARTWISE_HAPPY_HOUR_END", " 22 "),
            ("CARTWISE_CURRENCY_SYMBOL", "$"),
            ("CARTWISE_REFRESH_SECS", "10"),
            ("CARTWISE_STORE_NAME", "Env Store"),
        ]));

        assert_eq!(config.discounts.cap_rate.bps(), 3000);
        assert_eq!(config.discounts.happy_hour.start_hour, 17);
        assert_eq!(config.discounts.happy_hour.end_hour, 22);
        assert_eq!(config.discounts.currency_symbol, "$");
        assert_eq!(config.refresh.interval_secs, 10);
        assert_eq!(config.store.name, "Env Store");
    }

    #[test]
    fn test_unparseable_env_override_is_ignored() {
        let mut config = CheckoutConfig::default();
        config.apply_overrides(lookup_from(&[
            ("CARTWISE_CAP_BPS", "thirty-five"),
            ("CARTWISE_REFRESH_SECS", "-1"),
        ]));

        assert_eq!(config.discounts.cap_rate.bps(), 3500);
        assert_eq!(config.refresh.interval_secs, 30);
    }

    #[test]
    fn test_validation_failures() {
        let mut config = CheckoutConfig::default();
        config.refresh.interval_secs = 0;
        assert!(matches!(config.validate(), Err(CheckoutError::InvalidConfig(_))));

        let mut config = CheckoutConfig::default();
        config.store.name = "  ".to_string();
        assert!(matches!(config.validate(), Err(CheckoutError::InvalidConfig(_))));

        let mut config = CheckoutConfig::default();
        config.discounts.happy_hour.start_hour = 22;
        assert!(matches!(config.validate(), Err(CheckoutError::Core(_))));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(CONFIG_FILE_NAME));
        }
    }
}
