//! Saved-for-later products.

use std::collections::BTreeSet;

use toolsshare_core::ProductId;

use super::SnapshotError;

/// A set of product ids, iterated in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wishlist {
    ids: BTreeSet<ProductId>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Build a wishlist from persisted ids.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::DuplicateProduct` if an id appears twice.
    pub fn from_ids(ids: Vec<ProductId>) -> Result<Self, SnapshotError> {
        let mut set = BTreeSet::new();
        for id in ids {
            if set.contains(&id) {
                return Err(SnapshotError::DuplicateProduct(id));
            }
            set.insert(id);
        }
        Ok(Self { ids: set })
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// Returns `true` if `id` is in the wishlist afterwards.
    pub fn toggle(&mut self, id: &ProductId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    /// Ids in persisted order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ProductId> {
        self.ids.iter().cloned().collect()
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

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.toggle(&pid("saw")));
        assert!(wishlist.contains(&pid("saw")));
        assert!(!wishlist.toggle(&pid("saw")));
        assert!(!wishlist.contains(&pid("saw")));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut wishlist = Wishlist::new();
        for id in ["saw", "clamp", "drill"] {
            wishlist.toggle(&pid(id));
        }
        let ids: Vec<&str> = wishlist.iter().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["clamp", "drill", "saw"]);
    }

    #[test]
    fn test_from_ids_rejects_duplicates() {
        assert!(Wishlist::from_ids(vec![pid("saw"), pid("saw")]).is_err());
        assert_eq!(Wishlist::from_ids(vec![pid("saw"), pid("drill")]).unwrap().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_restores_membership(
            initial in prop::collection::btree_set("[a-z]{1,8}", 0..10),
            target in "[a-z]{1,8}",
        ) {
            let ids: Vec<ProductId> = initial.iter().map(|s| pid(s)).collect();
            let mut wishlist = Wishlist::from_ids(ids).unwrap();
            let before = wishlist.clone();
            let target = pid(&target);

            let first = wishlist.toggle(&target);
            let second = wishlist.toggle(&target);

            prop_assert_ne!(first, second);
            prop_assert_eq!(wishlist, before);
        }
    }
}
