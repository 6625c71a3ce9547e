//! Integration tests for ToolsShare.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p toolsshare-integration-tests
//!
//! # With logs
//! RUST_LOG=toolsshare_storefront=debug cargo test -p toolsshare-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart, wishlist and page projection through UI events
//! - `checkout_flow` - Order placement, escrow confirmation and the content gate
//! - `persistence` - Snapshots shared between page sessions

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use toolsshare_core::{CurrencyCode, Price, ProductId};
use toolsshare_storefront::{MemoryStore, StaticCatalog, StaticPage, Storefront, StorefrontConfig};
use tracing_subscriber::EnvFilter;

/// Storefront over in-memory collaborators.
pub type TestStorefront = Storefront<MemoryStore, StaticCatalog, StaticPage>;

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Fixed start time for timer-driven tests.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap()
}

/// Parse a product id known to be valid.
///
/// # Panics
///
/// Panics if `raw` is not a valid product id.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product(raw: &str) -> ProductId {
    ProductId::parse(raw).unwrap()
}

/// The catalog used across tests: a $60 drill, a $30 saw and a €45 ladder.
#[must_use]
pub fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with(product("drill"), Price::from_cents(6000, CurrencyCode::USD))
        .with(product("saw"), Price::from_cents(3000, CurrencyCode::USD))
        .with(
            product("ladder"),
            Price::new(Decimal::new(45, 0), CurrencyCode::EUR),
        )
}

/// A cart page session over `store` with default configuration.
#[must_use]
pub fn cart_page(store: &MemoryStore) -> TestStorefront {
    session(store, StorefrontConfig::default())
}

/// A cart page session over `store`.
#[must_use]
pub fn session(store: &MemoryStore, config: StorefrontConfig) -> TestStorefront {
    Storefront::new(config, store.clone(), catalog(), StaticPage::cart_page(2))
}
