//! ToolsShare storefront state.
//!
//! Cart and wishlist models persisted to a browser-style local store, the
//! page projection that keeps count badges and totals in sync, and the
//! event bindings that tie UI controls to both. Peripheral page behavior
//! (notifications, form validation, category filters, the checkout stepper
//! and the content gate) lives alongside.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bindings;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod forms;
pub mod gate;
pub mod notifications;
pub mod pricing;
pub mod product_filter;
pub mod store;
pub mod view;

pub use bindings::{EventOutcome, Storefront, TickOutcome, UiAction, UiEvent};
pub use cart::{Cart, CartLine, CartService, QuantityChange, Wishlist};
pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use pricing::{CartTotals, PriceCatalog, StaticCatalog};
pub use store::{LocalStore, MemoryStore, StoreAdapter, StoreError};
pub use view::{CartView, StaticPage, ViewSynchronizer};
