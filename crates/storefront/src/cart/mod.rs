//! Cart and wishlist state.
//!
//! [`Cart`] and [`Wishlist`] are plain in-memory models that enforce their
//! own invariants. [`CartService`] owns both together with the local store and
//! persists a snapshot after every mutation (write-through).

mod model;
mod service;
mod wishlist;

pub use model::{Cart, CartLine, QuantityChange, SnapshotError};
pub use service::CartService;
pub use wishlist::Wishlist;
