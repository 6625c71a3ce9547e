//! Projection of cart state onto the page.
//!
//! The synchronizer never holds cart data of its own: every refresh reads
//! the cart, derives what the page should show and writes it through the
//! [`CartView`] boundary. Refreshing twice in a row writes the same output.

use std::collections::{BTreeMap, BTreeSet};

use toolsshare_core::{ProductId, Quantity};

use crate::cart::Cart;
use crate::config::PricingConfig;
use crate::pricing::{CartTotals, PriceCatalog};

/// What every cart count indicator should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeState {
    pub text: String,
    pub visible: bool,
}

impl BadgeState {
    /// Badge for a cart holding `count` items; hidden when empty.
    #[must_use]
    pub fn for_count(count: u64) -> Self {
        Self {
            text: count.to_string(),
            visible: count > 0,
        }
    }
}

/// Formatted totals for the cart summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsText {
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

impl From<&CartTotals> for TotalsText {
    fn from(totals: &CartTotals) -> Self {
        Self {
            subtotal: totals.subtotal.display(),
            shipping: totals.shipping.display(),
            total: totals.total.display(),
        }
    }
}

/// Write side of the page.
pub trait CartView {
    /// Write `badge` to every cart count indicator.
    fn render_badge(&mut self, badge: &BadgeState);

    /// Write totals to the summary outputs, if the page has them.
    fn render_totals(&mut self, totals: &TotalsText);

    /// Show `quantity` in the line item for `id`; `None` removes the row.
    fn render_line(&mut self, id: &ProductId, quantity: Option<Quantity>);

    /// Mark the wishlist control for `id` as saved or not.
    fn render_wishlist_button(&mut self, id: &ProductId, saved: bool);
}

/// In-memory page model.
///
/// Holds a fixed number of count badges and, when the page has a cart
/// summary, the totals outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPage {
    pub badges: Vec<BadgeState>,
    pub totals: Option<TotalsText>,
    pub line_items: BTreeMap<ProductId, u32>,
    pub wishlisted: BTreeSet<ProductId>,
    has_summary: bool,
}

impl StaticPage {
    /// A page with `badge_count` count indicators and no cart summary.
    #[must_use]
    pub fn new(badge_count: usize) -> Self {
        Self {
            badges: vec![
                BadgeState {
                    text: String::new(),
                    visible: false,
                };
                badge_count
            ],
            ..Self::default()
        }
    }

    /// A cart page: badges plus subtotal/shipping/total outputs.
    #[must_use]
    pub fn cart_page(badge_count: usize) -> Self {
        Self {
            has_summary: true,
            ..Self::new(badge_count)
        }
    }

    /// Seed the line-item rows the page was rendered with.
    #[must_use]
    pub fn with_lines(mut self, cart: &Cart) -> Self {
        self.line_items = cart
            .lines()
            .iter()
            .map(|line| (line.id.clone(), line.quantity.get()))
            .collect();
        self
    }
}

impl CartView for StaticPage {
    fn render_badge(&mut self, badge: &BadgeState) {
        for slot in &mut self.badges {
            slot.clone_from(badge);
        }
    }

    fn render_totals(&mut self, totals: &TotalsText) {
        if self.has_summary {
            self.totals = Some(totals.clone());
        }
    }

    fn render_line(&mut self, id: &ProductId, quantity: Option<Quantity>) {
        match quantity {
            Some(q) => {
                if let Some(row) = self.line_items.get_mut(id) {
                    *row = q.get();
                }
            }
            None => {
                self.line_items.remove(id);
            }
        }
    }

    fn render_wishlist_button(&mut self, id: &ProductId, saved: bool) {
        if saved {
            self.wishlisted.insert(id.clone());
        } else {
            self.wishlisted.remove(id);
        }
    }
}

/// Recomputes derived UI state from the cart.
#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    pricing: PricingConfig,
    badge_dirty: bool,
    totals_dirty: bool,
}

impl ViewSynchronizer {
    /// A synchronizer that has not rendered anything yet.
    #[must_use]
    pub const fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            badge_dirty: true,
            totals_dirty: true,
        }
    }

    /// Record that the cart changed since the last refresh.
    pub const fn mark_dirty(&mut self) {
        self.badge_dirty = true;
        self.totals_dirty = true;
    }

    /// Whether the page reflects the cart as of the last mutation.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !self.badge_dirty && !self.totals_dirty
    }

    /// Write the cart's item count to every badge.
    pub fn refresh_cart_badge<V: CartView + ?Sized>(&mut self, cart: &Cart, view: &mut V) {
        let badge = BadgeState::for_count(cart.total_item_count());
        tracing::trace!(count = %badge.text, visible = badge.visible, "refreshing cart badge");
        view.render_badge(&badge);
        self.badge_dirty = false;
    }

    /// Recompute and write the cart totals.
    pub fn refresh_totals<V, C>(&mut self, cart: &Cart, catalog: &C, view: &mut V) -> CartTotals
    where
        V: CartView + ?Sized,
        C: PriceCatalog + ?Sized,
    {
        let totals = CartTotals::compute(cart, catalog, &self.pricing);
        view.render_totals(&TotalsText::from(&totals));
        self.totals_dirty = false;
        totals
    }

    /// Refresh badge and totals.
    pub fn refresh<V, C>(&mut self, cart: &Cart, catalog: &C, view: &mut V) -> CartTotals
    where
        V: CartView + ?Sized,
        C: PriceCatalog + ?Sized,
    {
        self.refresh_cart_badge(cart, view);
        self.refresh_totals(cart, catalog, view)
    }
}
