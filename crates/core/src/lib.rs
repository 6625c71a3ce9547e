//! ToolsShare Core - Shared types library.
//!
//! This crate provides the domain types used by the ToolsShare storefront
//! state layer:
//! - `storefront` - Cart, wishlist, checkout and page-state management
//! - `integration-tests` - End-to-end scenarios across the public API
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no storage, no
//! view code, no clocks. This keeps it lightweight and allows it to be used
//! anywhere, including from a `wasm32` build of the storefront.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, quantities, prices and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
