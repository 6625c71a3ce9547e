//! Cart lines and the ordered cart.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolsshare_core::{ProductId, Quantity};

/// A persisted snapshot violated a collection-level invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("duplicate entry for product {0}")]
    DuplicateProduct(ProductId),
}

/// One product-and-quantity pair.
///
/// Serialized as `{"id": "...", "quantity": n}`. Deserialization rejects
/// empty ids and zero quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CartLine {
    pub id: ProductId,
    pub quantity: Quantity,
}

impl CartLine {
    /// A new line with quantity one.
    #[must_use]
    pub const fn new(id: ProductId) -> Self {
        Self {
            id,
            quantity: Quantity::ONE,
        }
    }
}

/// Result of setting a line's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No line exists for the product; nothing changed.
    NotInCart,
    /// The line already had the requested quantity.
    Unchanged,
    /// The line now has the given quantity.
    Updated(Quantity),
    /// A quantity of zero was requested and the line was removed.
    Removed,
}

impl QuantityChange {
    /// Whether the cart was modified.
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        matches!(self, Self::Updated(_) | Self::Removed)
    }
}

/// Ordered cart lines, at most one per product.
///
/// Lines keep insertion order; removing a line closes the gap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from persisted lines.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::DuplicateProduct` if two lines share a product id.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, SnapshotError> {
        for (i, line) in lines.iter().enumerate() {
            if lines.iter().skip(i + 1).any(|other| other.id == line.id) {
                return Err(SnapshotError::DuplicateProduct(line.id.clone()));
            }
        }
        Ok(Self { lines })
    }

    /// Add one unit of `id`, appending a new line if needed.
    ///
    /// Returns the line's quantity after the add.
    pub fn add(&mut self, id: &ProductId) -> Quantity {
        if let Some(line) = self.line_mut(id) {
            line.quantity = line.quantity.incremented();
            return line.quantity;
        }
        self.lines.push(CartLine::new(id.clone()));
        Quantity::ONE
    }

    /// Remove the line for `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        self.lines.len() != before
    }

    /// Set the quantity of an existing line; `None` removes it.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: Option<Quantity>) -> QuantityChange {
        let Some(quantity) = quantity else {
            return if self.remove(id) {
                QuantityChange::Removed
            } else {
                QuantityChange::NotInCart
            };
        };

        match self.line_mut(id) {
            None => QuantityChange::NotInCart,
            Some(line) if line.quantity == quantity => QuantityChange::Unchanged,
            Some(line) => {
                line.quantity = quantity;
                QuantityChange::Updated(quantity)
            }
        }
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Quantity for `id`, if it is in the cart.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> Option<Quantity> {
        self.lines
            .iter()
            .find(|line| &line.id == id)
            .map(|line| line.quantity)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the cart holds at least the quantity of every line in `order`.
    #[must_use]
    pub fn covers(&self, order: &[CartLine]) -> bool {
        order.iter().all(|ordered| {
            self.quantity_of(&ordered.id)
                .is_some_and(|q| q >= ordered.quantity)
        })
    }

    /// Take the quantities in `order` out of the cart.
    ///
    /// Lines that drop to zero are removed; products added since the order
    /// was taken are left alone. Returns `true` if anything changed.
    pub fn deduct(&mut self, order: &[CartLine]) -> bool {
        let mut changed = false;
        for ordered in order {
            let Some(current) = self.quantity_of(&ordered.id) else {
                continue;
            };
            let remaining = Quantity::new(current.get().saturating_sub(ordered.quantity.get()));
            changed |= self.set_quantity(&ordered.id, remaining).is_mutation();
        }
        changed
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn pid(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    fn snapshot(cart: &Cart) -> Vec<(&str, u32)> {
        cart.lines()
            .iter()
            .map(|line| (line.id.as_str(), line.quantity.get()))
            .collect()
    }

    #[test]
    fn test_add_merges_and_appends() {
        let mut cart = Cart::new();
        cart.add(&pid("drill"));
        cart.add(&pid("drill"));
        cart.add(&pid("saw"));

        assert_eq!(snapshot(&cart), vec![("drill", 2), ("saw", 1)]);
        assert_eq!(cart.total_item_count(), 3);
    }

    #[test]
    fn test_add_returns_new_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&pid("drill")).get(), 1);
        assert_eq!(cart.add(&pid("drill")).get(), 2);
    }

    #[test]
    fn test_add_then_remove_is_empty() {
        let mut cart = Cart::new();
        cart.add(&pid("drill"));
        assert!(cart.remove(&pid("drill")));
        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(&pid("saw"));
        assert!(!cart.remove(&pid("drill")));
        assert_eq!(snapshot(&cart), vec![("saw", 1)]);
    }

    #[test]
    fn test_remove_compacts_and_keeps_order() {
        let mut cart = Cart::new();
        for id in ["drill", "saw", "sander"] {
            cart.add(&pid(id));
        }
        cart.remove(&pid("saw"));
        cart.add(&pid("saw"));
        assert_eq!(snapshot(&cart), vec![("drill", 1), ("sander", 1), ("saw", 1)]);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add(&pid("drill"));

        let five = Quantity::new(5).unwrap();
        assert_eq!(cart.set_quantity(&pid("drill"), Some(five)), QuantityChange::Updated(five));
        assert_eq!(cart.set_quantity(&pid("drill"), Some(five)), QuantityChange::Unchanged);
        assert_eq!(cart.total_item_count(), 5);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(&pid("drill"));
        assert_eq!(cart.set_quantity(&pid("drill"), None), QuantityChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.set_quantity(&pid("drill"), Some(Quantity::ONE)),
            QuantityChange::NotInCart
        );
        assert_eq!(cart.set_quantity(&pid("drill"), None), QuantityChange::NotInCart);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_rejects_duplicates() {
        let lines = vec![CartLine::new(pid("drill")), CartLine::new(pid("drill"))];
        assert_eq!(
            Cart::from_lines(lines),
            Err(SnapshotError::DuplicateProduct(pid("drill")))
        );
    }

    #[test]
    fn test_line_json_shape() {
        let line = CartLine {
            id: pid("drill"),
            quantity: Quantity::new(2).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"id":"drill","quantity":2}"#
        );
        assert!(serde_json::from_str::<CartLine>(r#"{"id":"drill","quantity":0}"#).is_err());
        assert!(serde_json::from_str::<CartLine>(r#"{"id":"","quantity":1}"#).is_err());
        assert!(serde_json::from_str::<CartLine>(r#"{"id":"drill"}"#).is_err());
    }

    #[test]
    fn test_covers_and_deduct() {
        let mut cart = Cart::new();
        cart.add(&pid("drill"));
        cart.add(&pid("drill"));
        let order = cart.lines().to_vec();

        cart.add(&pid("saw"));
        assert!(cart.covers(&order));
        assert!(cart.deduct(&order));
        assert_eq!(snapshot(&cart), vec![("saw", 1)]);
        assert!(!cart.covers(&order));
    }

    #[test]
    fn test_deduct_keeps_extra_units() {
        let mut cart = Cart::new();
        cart.add(&pid("drill"));
        let order = cart.lines().to_vec();
        cart.add(&pid("drill"));
        cart.add(&pid("drill"));

        assert!(cart.deduct(&order));
        assert_eq!(snapshot(&cart), vec![("drill", 2)]);
        assert!(!Cart::new().deduct(&order));
    }

    fn product_ids() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["drill", "saw", "sander", "router", "clamp"])
            .prop_map(str::to_string)
    }

    proptest! {
        #[test]
        fn prop_repeated_adds_accumulate_on_one_line(id in product_ids(), n in 1usize..50) {
            let id = pid(&id);
            let mut cart = Cart::new();
            for _ in 0..n {
                cart.add(&id);
            }
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.total_item_count(), n as u64);
        }

        #[test]
        fn prop_one_line_per_product(ids in prop::collection::vec(product_ids(), 0..40)) {
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(&pid(id));
            }
            prop_assert_eq!(cart.total_item_count(), ids.len() as u64);
            prop_assert!(Cart::from_lines(cart.lines().to_vec()).is_ok());
        }

        #[test]
        fn prop_remove_is_idempotent(ids in prop::collection::vec(product_ids(), 0..20), target in product_ids()) {
            let target = pid(&target);
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(&pid(id));
            }
            cart.remove(&target);
            let after_first = cart.clone();
            prop_assert!(!cart.remove(&target));
            prop_assert_eq!(cart, after_first);
        }
    }
}
