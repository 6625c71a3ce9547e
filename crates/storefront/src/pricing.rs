//! Price lookup and cart totals.
//!
//! Prices are not stored with the cart; they come from a [`PriceCatalog`]
//! supplied by the page (typically built from the product cards' data
//! attributes or a product feed) and totals are recomputed on every refresh.

use std::collections::HashMap;

use toolsshare_core::{Price, ProductId};

use crate::cart::Cart;
use crate::config::PricingConfig;

/// Source of unit prices.
pub trait PriceCatalog {
    /// Unit price for `id`, or `None` if the product is unknown.
    fn price_of(&self, id: &ProductId) -> Option<Price>;
}

/// Map-backed catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    prices: HashMap<ProductId, Price>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unit price for `id`, replacing any previous price.
    pub fn insert(&mut self, id: ProductId, price: Price) {
        self.prices.insert(id, price);
    }

    /// Builder-style [`Self::insert`].
    #[must_use]
    pub fn with(mut self, id: ProductId, price: Price) -> Self {
        self.insert(id, price);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceCatalog for StaticCatalog {
    fn price_of(&self, id: &ProductId) -> Option<Price> {
        self.prices.get(id).copied()
    }
}

impl FromIterator<(ProductId, Price)> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = (ProductId, Price)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Subtotal, shipping and total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    /// Lines skipped because the catalog had no usable price for them.
    pub unpriced_lines: usize,
}

impl CartTotals {
    /// Derive totals from the cart contents.
    ///
    /// Lines whose product is missing from the catalog, is priced in another
    /// currency, or overflows are left out of the subtotal and counted in
    /// `unpriced_lines`. Shipping is charged only when the subtotal is
    /// non-zero.
    #[must_use]
    pub fn compute<C: PriceCatalog + ?Sized>(cart: &Cart, catalog: &C, pricing: &PricingConfig) -> Self {
        let currency = pricing.currency;
        let mut subtotal = Price::zero(currency);
        let mut unpriced_lines = 0;

        for line in cart.lines() {
            let line_total = catalog
                .price_of(&line.id)
                .filter(|unit| unit.currency_code == currency)
                .and_then(|unit| unit.checked_times(line.quantity.get()))
                .and_then(|amount| subtotal.checked_add(&amount));

            match line_total {
                Some(sum) => subtotal = sum,
                None => {
                    tracing::warn!(product = %line.id, "no usable price, leaving line out of totals");
                    unpriced_lines += 1;
                }
            }
        }

        let shipping = if subtotal.is_zero() || pricing.shipping_rate.currency_code != currency {
            Price::zero(currency)
        } else {
            pricing.shipping_rate
        };
        let total = subtotal.checked_add(&shipping).unwrap_or(subtotal);

        Self {
            subtotal,
            shipping,
            total,
            unpriced_lines,
        }
    }
}
