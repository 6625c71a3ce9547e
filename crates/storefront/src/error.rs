//! Unified error handling for UI event dispatch.
//!
//! Provides a unified `StorefrontError` returned by the event bindings. Model
//! operations degrade to no-ops or empty defaults wherever they can; the
//! errors that remain are rejected user input and failed writes to the local
//! store.

use thiserror::Error;
use toolsshare_core::{ProductIdError, QuantityError};

use crate::config::ConfigError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Local store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A `data-product-id` value was not a usable product id.
    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    /// A quantity input could not be parsed.
    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// A `data-action` value is not bound to any operation.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The request cannot be carried out in the current state.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl StorefrontError {
    /// Whether the error was caused by user input rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ProductId(_) | Self::Quantity(_) | Self::UnknownAction(_) | Self::BadRequest(_)
        )
    }
}
