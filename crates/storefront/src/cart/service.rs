//! Write-through cart and wishlist service.

use toolsshare_core::{ProductId, Quantity};
use tracing::instrument;

use super::{Cart, CartLine, QuantityChange, Wishlist};
use crate::config::StorageKeys;
use crate::error::StorefrontError;
use crate::store::{LocalStore, StoreAdapter, StoreError};

/// Owns the live cart and wishlist for a page session.
///
/// Both are loaded from the store when the service is constructed and saved
/// back after every mutation, before the mutating call returns.
///
/// If a save fails the in-memory state keeps the mutation and the error is
/// returned; the store still holds the previous snapshot until the next
/// successful save overwrites it.
#[derive(Debug)]
pub struct CartService<S> {
    store: StoreAdapter<S>,
    keys: StorageKeys,
    cart: Cart,
    wishlist: Wishlist,
}

impl<S: LocalStore> CartService<S> {
    /// Load cart and wishlist from `backend`.
    ///
    /// Snapshots that fail to decode or violate an invariant are discarded
    /// and the corresponding model starts empty.
    pub fn new(backend: S, keys: StorageKeys) -> Self {
        let store = StoreAdapter::new(backend);

        let cart = Cart::from_lines(store.load::<CartLine>(&keys.cart)).unwrap_or_else(|e| {
            tracing::warn!(key = %keys.cart, error = %e, "discarding invalid cart snapshot");
            Cart::new()
        });
        let wishlist = Wishlist::from_ids(store.load::<ProductId>(&keys.wishlist))
            .unwrap_or_else(|e| {
                tracing::warn!(key = %keys.wishlist, error = %e, "discarding invalid wishlist snapshot");
                Wishlist::new()
            });

        tracing::debug!(
            lines = cart.len(),
            wishlist = wishlist.len(),
            "cart service initialized"
        );

        Self {
            store,
            keys,
            cart,
            wishlist,
        }
    }

    /// Add one unit of `id` to the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the snapshot could not be saved.
    #[instrument(skip(self, id), fields(product = %id))]
    pub fn add_item(&mut self, id: &ProductId) -> Result<Quantity, StorefrontError> {
        let quantity = self.cart.add(id);
        tracing::debug!(quantity = quantity.get(), "added to cart");
        self.persist_cart()?;
        Ok(quantity)
    }

    /// Remove the line for `id`. Returns `false` if it was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the snapshot could not be saved.
    #[instrument(skip(self, id), fields(product = %id))]
    pub fn remove_item(&mut self, id: &ProductId) -> Result<bool, StorefrontError> {
        if !self.cart.remove(id) {
            tracing::debug!("remove ignored, product not in cart");
            return Ok(false);
        }
        self.persist_cart()?;
        Ok(true)
    }

    /// Set the quantity of an existing line from raw form input.
    ///
    /// A quantity of zero removes the line. Products not in the cart are
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Quantity` for unparsable input (the cart is
    /// unchanged) and `StorefrontError::Store` if the snapshot could not be
    /// saved.
    #[instrument(skip(self, id), fields(product = %id))]
    pub fn set_quantity(&mut self, id: &ProductId, raw: &str) -> Result<QuantityChange, StorefrontError> {
        let quantity = Quantity::parse_input(raw)?;
        let change = self.cart.set_quantity(id, quantity);
        tracing::debug!(?change, "quantity set");
        if change.is_mutation() {
            self.persist_cart()?;
        }
        Ok(change)
    }

    /// Take a confirmed order's quantities out of the cart.
    ///
    /// Items added after the order was placed stay in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the snapshot could not be saved.
    pub fn deduct_order(&mut self, order: &[CartLine]) -> Result<(), StorefrontError> {
        if self.cart.deduct(order) {
            tracing::debug!(lines = order.len(), "ordered quantities removed from cart");
            self.persist_cart()?;
        }
        Ok(())
    }

    /// Toggle `id` in the wishlist; returns the resulting membership.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Store` if the snapshot could not be saved.
    #[instrument(skip(self, id), fields(product = %id))]
    pub fn toggle_wishlist(&mut self, id: &ProductId) -> Result<bool, StorefrontError> {
        let member = self.wishlist.toggle(id);
        tracing::debug!(member, "wishlist toggled");
        self.store
            .save(&self.keys.wishlist, &self.wishlist.to_vec())
            .inspect_err(|e| log_save_failure(&self.keys.wishlist, e))?;
        Ok(member)
    }

    /// Sum of quantities across all cart lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    #[must_use]
    pub fn in_wishlist(&self, id: &ProductId) -> bool {
        self.wishlist.contains(id)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Borrow the store backend.
    #[must_use]
    pub const fn backend(&self) -> &S {
        self.store.backend()
    }

    fn persist_cart(&mut self) -> Result<(), StoreError> {
        self.store
            .save(&self.keys.cart, self.cart.lines())
            .inspect_err(|e| log_save_failure(&self.keys.cart, e))
    }
}

fn log_save_failure(key: &str, error: &StoreError) {
    tracing::error!(key, error = %error, "failed to persist snapshot, keeping in-memory state");
}
