//! Core types for ToolsShare.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod quantity;

pub use email::{Email, EmailError};
pub use id::{ProductId, ProductIdError};
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use quantity::{Quantity, QuantityError};
