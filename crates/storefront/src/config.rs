//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TOOLSSHARE_CART_KEY` - Local store key for the cart (default: toolsshare-cart)
//! - `TOOLSSHARE_WISHLIST_KEY` - Local store key for the wishlist (default: toolsshare-wishlist)
//! - `TOOLSSHARE_CURRENCY` - ISO 4217 currency for totals (default: USD)
//! - `TOOLSSHARE_SHIPPING_RATE` - Flat shipping charge for a non-empty cart (default: 15.00)
//! - `TOOLSSHARE_NOTIFICATION_TIMEOUT_MS` - Toast auto-dismiss delay (default: 5000)
//! - `TOOLSSHARE_ESCROW_DELAY_MS` - Simulated escrow confirmation delay (default: 3000)
//! - `TOOLSSHARE_GATE_PASSWORD` - Password for the faculty content gate (gate stays locked if unset)

use std::str::FromStr;

use chrono::TimeDelta;
use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use toolsshare_core::{CurrencyCode, Price};

pub const DEFAULT_CART_KEY: &str = "toolsshare-cart";
pub const DEFAULT_WISHLIST_KEY: &str = "toolsshare-wishlist";
const DEFAULT_SHIPPING_RATE: &str = "15.00";
const DEFAULT_NOTIFICATION_TIMEOUT_MS: i64 = 5_000;
const DEFAULT_ESCROW_DELAY_MS: i64 = 3_000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Local store keys for persisted state
    pub storage: StorageKeys,
    /// Currency and shipping used when deriving totals
    pub pricing: PricingConfig,
    /// How long a notification stays on screen
    pub notification_timeout: TimeDelta,
    /// How long the simulated escrow transaction stays in processing
    pub escrow_delay: TimeDelta,
    /// Faculty content gate password
    pub gate_password: Option<SecretString>,
}

/// Keys under which cart and wishlist snapshots are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub cart: String,
    pub wishlist: String,
}

/// Totals derivation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// Currency every total is reported in
    pub currency: CurrencyCode,
    /// Flat shipping charged once the priced subtotal is non-zero
    pub shipping_rate: Price,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: DEFAULT_CART_KEY.to_string(),
            wishlist: DEFAULT_WISHLIST_KEY.to_string(),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::USD,
            shipping_rate: Price::from_cents(1500, CurrencyCode::USD),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            pricing: PricingConfig::default(),
            notification_timeout: TimeDelta::milliseconds(DEFAULT_NOTIFICATION_TIMEOUT_MS),
            escrow_delay: TimeDelta::milliseconds(DEFAULT_ESCROW_DELAY_MS),
            gate_password: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = StorageKeys {
            cart: get_key_or_default(&lookup, "TOOLSSHARE_CART_KEY", DEFAULT_CART_KEY)?,
            wishlist: get_key_or_default(&lookup, "TOOLSSHARE_WISHLIST_KEY", DEFAULT_WISHLIST_KEY)?,
        };
        if storage.cart == storage.wishlist {
            return Err(ConfigError::InvalidEnvVar(
                "TOOLSSHARE_WISHLIST_KEY".to_string(),
                "must differ from TOOLSSHARE_CART_KEY".to_string(),
            ));
        }

        let currency: CurrencyCode = parse_or_default(&lookup, "TOOLSSHARE_CURRENCY", "USD")?;
        let shipping_amount: Decimal =
            parse_or_default(&lookup, "TOOLSSHARE_SHIPPING_RATE", DEFAULT_SHIPPING_RATE)?;
        if shipping_amount.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "TOOLSSHARE_SHIPPING_RATE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let notification_timeout =
            get_millis(&lookup, "TOOLSSHARE_NOTIFICATION_TIMEOUT_MS", DEFAULT_NOTIFICATION_TIMEOUT_MS)?;
        let escrow_delay = get_millis(&lookup, "TOOLSSHARE_ESCROW_DELAY_MS", DEFAULT_ESCROW_DELAY_MS)?;

        let gate_password = lookup("TOOLSSHARE_GATE_PASSWORD")
            .filter(|value| !value.is_empty())
            .map(SecretString::from);

        Ok(Self {
            storage,
            pricing: PricingConfig {
                currency,
                shipping_rate: Price::new(shipping_amount, currency),
            },
            notification_timeout,
            escrow_delay,
            gate_password,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a non-blank storage key, falling back to a default when unset.
fn get_key_or_default<F>(lookup: &F, key: &str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be blank".to_string(),
        )),
        Some(value) => Ok(value),
        None => Ok(default.to_string()),
    }
}

/// Parse a variable with `FromStr`, using `default` when unset.
fn parse_or_default<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a non-negative millisecond duration.
fn get_millis<F>(lookup: &F, key: &str, default: i64) -> Result<TimeDelta, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(TimeDelta::milliseconds(default));
    };
    let millis = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(TimeDelta::milliseconds(i64::from(millis)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.storage.cart, "toolsshare-cart");
        assert_eq!(config.storage.wishlist, "toolsshare-wishlist");
        assert_eq!(config.pricing.currency, CurrencyCode::USD);
        assert_eq!(config.pricing.shipping_rate.display(), "$15.00");
        assert_eq!(config.notification_timeout, TimeDelta::seconds(5));
        assert_eq!(config.escrow_delay, TimeDelta::seconds(3));
        assert!(config.gate_password.is_none());
    }

    #[test]
    fn test_matches_default_impl() {
        let loaded = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();
        let default = StorefrontConfig::default();
        assert_eq!(loaded.storage, default.storage);
        assert_eq!(loaded.pricing, default.pricing);
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("TOOLSSHARE_CART_KEY", "ts-cart-v2"),
            ("TOOLSSHARE_CURRENCY", "inr"),
            ("TOOLSSHARE_SHIPPING_RATE", "49.50"),
            ("TOOLSSHARE_NOTIFICATION_TIMEOUT_MS", "1500"),
            ("TOOLSSHARE_GATE_PASSWORD", "letmein"),
        ]))
        .unwrap();

        assert_eq!(config.storage.cart, "ts-cart-v2");
        assert_eq!(config.pricing.currency, CurrencyCode::INR);
        assert_eq!(config.pricing.shipping_rate.display(), "₹49.50");
        assert_eq!(config.notification_timeout, TimeDelta::milliseconds(1500));
        assert_eq!(
            config.gate_password.unwrap().expose_secret(),
            "letmein"
        );
    }

    #[test]
    fn test_invalid_currency() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("TOOLSSHARE_CURRENCY", "doubloons")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TOOLSSHARE_CURRENCY"));
    }

    #[test]
    fn test_negative_shipping_rejected() {
        let result =
            StorefrontConfig::from_lookup(lookup_from(&[("TOOLSSHARE_SHIPPING_RATE", "-1")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = StorefrontConfig::from_lookup(lookup_from(&[(
            "TOOLSSHARE_ESCROW_DELAY_MS",
            "soon",
        )]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_and_colliding_keys_rejected() {
        assert!(StorefrontConfig::from_lookup(lookup_from(&[("TOOLSSHARE_CART_KEY", "  ")])).is_err());
        assert!(
            StorefrontConfig::from_lookup(lookup_from(&[
                ("TOOLSSHARE_CART_KEY", "shared"),
                ("TOOLSSHARE_WISHLIST_KEY", "shared"),
            ]))
            .is_err()
        );
    }

    #[test]
    fn test_empty_gate_password_is_unset() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("TOOLSSHARE_GATE_PASSWORD", "")])).unwrap();
        assert!(config.gate_password.is_none());
    }

    #[test]
    fn test_debug_redacts_gate_password() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[(
            "TOOLSSHARE_GATE_PASSWORD",
            "super_secret_gate_value",
        )]))
        .unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("super_secret_gate_value"));
    }
}
