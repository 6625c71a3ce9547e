//! UI event bindings.
//!
//! Controls carry a `data-action` naming what they do and a
//! `data-product-id` naming what they act on. [`Storefront`] turns those
//! events into cart and wishlist operations, refreshes the page projection
//! and raises notifications. It is the only caller of both the cart service
//! and the view synchronizer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use toolsshare_core::{ProductId, QuantityError};
use tracing::instrument;

use crate::cart::{CartService, QuantityChange};
use crate::checkout::{EscrowStatus, EscrowTransaction};
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::gate::{ContentGate, GateState};
use crate::notifications::{NotificationCenter, NotificationKind};
use crate::pricing::{CartTotals, PriceCatalog};
use crate::store::LocalStore;
use crate::view::{CartView, ViewSynchronizer};

/// Messages shown to the shopper.
pub mod messages {
    pub const ADDED_TO_CART: &str = "Item added to cart!";
    pub const ADDED_TO_WISHLIST: &str = "Added to wishlist!";
    pub const REMOVED_FROM_WISHLIST: &str = "Removed from wishlist";
    pub const INVALID_QUANTITY: &str = "Please enter a valid quantity";
    pub const NOT_SAVED: &str = "Your cart could not be saved on this device";
    pub const ACCESS_GRANTED: &str = "Access granted!";
    pub const ACCESS_DENIED: &str = "Incorrect password. Try again.";
    pub const CART_EMPTY: &str = "Your cart is empty";
    pub const ORDER_CANCELLED: &str = "Your cart changed during payment, order cancelled";
}

/// Value of a control's `data-action` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    AddToCart,
    AddToWishlist,
    RemoveFromCart,
    /// Change event from a cart line's quantity input.
    UpdateQuantity,
}

impl UiAction {
    /// The attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddToCart => "add-to-cart",
            Self::AddToWishlist => "add-to-wishlist",
            Self::RemoveFromCart => "remove-from-cart",
            Self::UpdateQuantity => "update-quantity",
        }
    }
}

impl fmt::Display for UiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiAction {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add-to-cart" => Ok(Self::AddToCart),
            "add-to-wishlist" => Ok(Self::AddToWishlist),
            "remove-from-cart" => Ok(Self::RemoveFromCart),
            "update-quantity" => Ok(Self::UpdateQuantity),
            other => Err(StorefrontError::UnknownAction(other.to_string())),
        }
    }
}

/// A click or change on a bound control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub action: UiAction,
    pub product_id: ProductId,
    /// Raw input value, for quantity changes.
    pub value: Option<String>,
}

impl UiEvent {
    /// Build an event from a control's data attributes.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::UnknownAction` or `StorefrontError::ProductId`
    /// if either attribute is unusable.
    pub fn from_attributes(action: &str, product_id: &str, value: Option<&str>) -> Result<Self, StorefrontError> {
        Ok(Self {
            action: action.parse()?,
            product_id: ProductId::parse(product_id)?,
            value: value.map(str::to_string),
        })
    }

    #[must_use]
    pub const fn new(action: UiAction, product_id: ProductId) -> Self {
        Self {
            action,
            product_id,
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// What an event did to the cart or wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    AddedToCart { quantity: u32 },
    WishlistToggled { saved: bool },
    RemovedFromCart { removed: bool },
    QuantityChanged(QuantityChange),
}

/// Work done by a timer tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub notifications_expired: usize,
    pub order_confirmed: bool,
    pub order_cancelled: bool,
}

/// Page session: cart state, page projection, notifications and the
/// checkout/gate collaborators.
pub struct Storefront<S, C, V> {
    cart: CartService<S>,
    catalog: C,
    view: V,
    sync: ViewSynchronizer,
    notifications: NotificationCenter,
    gate: ContentGate,
    escrow: Option<EscrowTransaction>,
    config: StorefrontConfig,
}

impl<S, C, V> Storefront<S, C, V>
where
    S: LocalStore,
    C: PriceCatalog,
    V: CartView,
{
    /// Load persisted state from `backend` and render it into `view`.
    pub fn new(config: StorefrontConfig, backend: S, catalog: C, view: V) -> Self {
        let cart = CartService::new(backend, config.storage.clone());
        let sync = ViewSynchronizer::new(config.pricing);
        let notifications = NotificationCenter::new(config.notification_timeout);
        let gate = ContentGate::new(config.gate_password.clone());

        let mut storefront = Self {
            cart,
            catalog,
            view,
            sync,
            notifications,
            gate,
            escrow: None,
            config,
        };
        for id in storefront.cart.wishlist().iter() {
            storefront.view.render_wishlist_button(id, true);
        }
        storefront.refresh();
        storefront
    }

    /// Dispatch a UI event.
    ///
    /// The page is refreshed whether or not the operation succeeds, so it
    /// always reflects the in-memory cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Quantity` for rejected or missing quantity
    /// input and `StorefrontError::Store` if the new state could not be
    /// persisted.
    #[instrument(skip(self, event, now), fields(action = %event.action, product = %event.product_id))]
    pub fn handle(&mut self, event: &UiEvent, now: DateTime<Utc>) -> Result<EventOutcome, StorefrontError> {
        let result = self.dispatch(event);
        self.sync.mark_dirty();
        self.refresh();

        match &result {
            Ok(outcome) => self.announce(*outcome, now),
            Err(StorefrontError::Quantity(e)) => {
                tracing::debug!(error = %e, "quantity input rejected");
                // Put the input back to the stored quantity.
                let current = self.cart.cart().quantity_of(&event.product_id);
                self.view.render_line(&event.product_id, current);
                self.notifications
                    .show(messages::INVALID_QUANTITY, NotificationKind::Error, now);
            }
            Err(StorefrontError::Store(_)) => {
                self.notifications
                    .show(messages::NOT_SAVED, NotificationKind::Warning, now);
            }
            Err(e) => tracing::warn!(error = %e, "event rejected"),
        }

        result
    }

    /// Convenience for raw data attributes.
    ///
    /// # Errors
    ///
    /// As [`Self::handle`], plus attribute parsing errors.
    pub fn handle_attributes(
        &mut self,
        action: &str,
        product_id: &str,
        value: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<EventOutcome, StorefrontError> {
        let event = UiEvent::from_attributes(action, product_id, value).inspect_err(|e| {
            tracing::warn!(action, product_id, error = %e, "ignoring malformed control");
        })?;
        self.handle(&event, now)
    }

    fn dispatch(&mut self, event: &UiEvent) -> Result<EventOutcome, StorefrontError> {
        let id = &event.product_id;
        match event.action {
            UiAction::AddToCart => {
                let quantity = self.cart.add_item(id)?;
                Ok(EventOutcome::AddedToCart {
                    quantity: quantity.get(),
                })
            }
            UiAction::AddToWishlist => {
                let saved = self.cart.toggle_wishlist(id);
                // Render the in-memory membership even if persisting failed.
                self.view
                    .render_wishlist_button(id, self.cart.in_wishlist(id));
                saved.map(|saved| EventOutcome::WishlistToggled { saved })
            }
            UiAction::RemoveFromCart => {
                let removed = self.cart.remove_item(id);
                self.view.render_line(id, self.cart.cart().quantity_of(id));
                removed.map(|removed| EventOutcome::RemovedFromCart { removed })
            }
            UiAction::UpdateQuantity => {
                let raw = event.value.as_deref().ok_or_else(|| {
                    StorefrontError::Quantity(QuantityError::Empty)
                })?;
                let change = self.cart.set_quantity(id, raw)?;
                self.view.render_line(id, self.cart.cart().quantity_of(id));
                Ok(EventOutcome::QuantityChanged(change))
            }
        }
    }

    fn announce(&mut self, outcome: EventOutcome, now: DateTime<Utc>) {
        let message = match outcome {
            EventOutcome::AddedToCart { .. } => messages::ADDED_TO_CART,
            EventOutcome::WishlistToggled { saved: true } => messages::ADDED_TO_WISHLIST,
            EventOutcome::WishlistToggled { saved: false } => messages::REMOVED_FROM_WISHLIST,
            EventOutcome::RemovedFromCart { .. } | EventOutcome::QuantityChanged(_) => return,
        };
        self.notifications
            .show(message, NotificationKind::Success, now);
    }

    /// Re-render badge and totals from the current cart.
    pub fn refresh(&mut self) -> CartTotals {
        self.sync
            .refresh(self.cart.cart(), &self.catalog, &mut self.view)
    }

    /// Place the order and start the simulated escrow confirmation.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::BadRequest` if the cart is empty or an order
    /// is already processing.
    pub fn place_order(&mut self, now: DateTime<Utc>) -> Result<(), StorefrontError> {
        if self.cart.cart().is_empty() {
            self.notifications
                .show(messages::CART_EMPTY, NotificationKind::Warning, now);
            return Err(StorefrontError::BadRequest("cart is empty".to_string()));
        }
        if self.escrow.is_some() {
            return Err(StorefrontError::BadRequest(
                "an order is already processing".to_string(),
            ));
        }
        tracing::info!(items = self.cart.total_item_count(), "order placed, escrow processing");
        self.escrow = Some(EscrowTransaction::begin(
            self.cart.cart().lines().to_vec(),
            now,
            self.config.escrow_delay,
        ));
        Ok(())
    }

    /// Run timer work due at `now`: expire notifications and settle a
    /// processing order.
    ///
    /// A confirmed order takes the ordered quantities out of the cart and
    /// leaves anything added since. An order whose items are no longer in the
    /// cart is cancelled and the cart is left as it is.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let notifications_expired = self.notifications.expire(now);

        let settled = self
            .escrow
            .as_mut()
            .and_then(|tx| tx.poll(now, self.cart.cart()));
        let mut outcome = TickOutcome {
            notifications_expired,
            ..TickOutcome::default()
        };

        let Some(status) = settled else {
            return outcome;
        };
        let Some(tx) = self.escrow.take() else {
            return outcome;
        };

        match status {
            EscrowStatus::Confirmed => {
                if let Err(e) = self.cart.deduct_order(tx.order()) {
                    tracing::error!(error = %e, "failed to persist cart after order");
                }
                self.sync.mark_dirty();
                self.refresh();
                outcome.order_confirmed = true;
            }
            EscrowStatus::Cancelled => {
                tracing::warn!(lines = tx.order().len(), "ordered items left the cart, order cancelled");
                self.notifications
                    .show(messages::ORDER_CANCELLED, NotificationKind::Warning, now);
                outcome.order_cancelled = true;
            }
            EscrowStatus::Processing => {}
        }
        outcome
    }

    /// Submit the content gate password form.
    pub fn unlock_gate(&mut self, attempt: &str, now: DateTime<Utc>) -> GateState {
        let state = self.gate.unlock(attempt);
        match state {
            GateState::Unlocked => self
                .notifications
                .show(messages::ACCESS_GRANTED, NotificationKind::Success, now),
            GateState::Locked => self
                .notifications
                .show(messages::ACCESS_DENIED, NotificationKind::Error, now),
        };
        state
    }

    #[must_use]
    pub const fn cart(&self) -> &CartService<S> {
        &self.cart
    }

    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Close a notification from its close button.
    pub fn dismiss_notification(&mut self, id: uuid::Uuid) -> bool {
        self.notifications.dismiss(id)
    }

    #[must_use]
    pub const fn escrow(&self) -> Option<&EscrowTransaction> {
        self.escrow.as_ref()
    }

    #[must_use]
    pub const fn gate(&self) -> &ContentGate {
        &self.gate
    }

    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.sync.is_clean()
    }
}
