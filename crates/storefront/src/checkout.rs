//! Simulated multi-step checkout.
//!
//! No payment is taken. The stepper tracks which section is shown, the
//! payment method selects which field group is visible, and placing the
//! order starts an [`EscrowTransaction`] that confirms itself after a fixed
//! delay.

use chrono::{DateTime, TimeDelta, Utc};

use crate::cart::{Cart, CartLine};

/// Display status of one step in the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
}

impl StepStatus {
    /// Modifier class for the step element, if any.
    #[must_use]
    pub const fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Completed => Some("ts-stepper__step--completed"),
            Self::Active => Some("ts-stepper__step--active"),
            Self::Upcoming => None,
        }
    }
}

/// Position within a fixed number of checkout steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutStepper {
    current: usize,
    step_count: usize,
}

impl CheckoutStepper {
    /// A stepper on the first of `step_count` steps.
    #[must_use]
    pub const fn new(step_count: usize) -> Self {
        Self {
            current: 0,
            step_count,
        }
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn step_count(&self) -> usize {
        self.step_count
    }

    /// Advance one step. Returns `false` on the last step.
    pub const fn next(&mut self) -> bool {
        if self.current + 1 < self.step_count {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one step. Returns `false` on the first step.
    pub const fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current + 1 >= self.step_count
    }

    /// Status of step `index`.
    #[must_use]
    pub const fn status(&self, index: usize) -> StepStatus {
        if index < self.current {
            StepStatus::Completed
        } else if index == self.current {
            StepStatus::Active
        } else {
            StepStatus::Upcoming
        }
    }

    /// Status of every step, first to last.
    #[must_use]
    pub fn statuses(&self) -> Vec<StepStatus> {
        (0..self.step_count).map(|i| self.status(i)).collect()
    }
}

/// Selectable payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Card,
    Upi,
    NetBanking,
}

impl PaymentMethod {
    /// Id of the field group shown for this method.
    #[must_use]
    pub const fn fields_id(self) -> &'static str {
        match self {
            Self::Card => "card-fields",
            Self::Upi => "upi-fields",
            Self::NetBanking => "net-banking-fields",
        }
    }

    /// Parse the radio button value. Unknown values select nothing.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            "netbanking" => Some(Self::NetBanking),
            _ => None,
        }
    }

    /// Which field group is visible for a radio value; all others are hidden.
    #[must_use]
    pub fn visible_fields(value: &str) -> Option<&'static str> {
        Self::from_value(value).map(Self::fields_id)
    }
}

/// State of the simulated escrow transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowStatus {
    Processing,
    Confirmed,
    /// The cart no longer held the ordered items when the delay passed.
    Cancelled,
}

/// Order confirmation that completes after a fixed delay.
///
/// Holds the lines that were in the cart when the order was placed, so
/// confirmation only ever accounts for what was actually ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowTransaction {
    order: Vec<CartLine>,
    started_at: DateTime<Utc>,
    confirm_at: DateTime<Utc>,
    status: EscrowStatus,
}

impl EscrowTransaction {
    /// Start processing `order` at `now`.
    #[must_use]
    pub fn begin(order: Vec<CartLine>, now: DateTime<Utc>, delay: TimeDelta) -> Self {
        Self {
            order,
            started_at: now,
            confirm_at: now + delay,
            status: EscrowStatus::Processing,
        }
    }

    /// Advance the timer against the current cart.
    ///
    /// Returns the final status on the tick that settles the transaction: it
    /// confirms if `cart` still holds every ordered quantity and is cancelled
    /// otherwise. Returns `None` while processing and once settled.
    pub fn poll(&mut self, now: DateTime<Utc>, cart: &Cart) -> Option<EscrowStatus> {
        if self.status != EscrowStatus::Processing || now < self.confirm_at {
            return None;
        }
        self.status = if !self.order.is_empty() && cart.covers(&self.order) {
            EscrowStatus::Confirmed
        } else {
            EscrowStatus::Cancelled
        };
        tracing::info!(
            started_at = %self.started_at,
            status = ?self.status,
            lines = self.order.len(),
            "escrow transaction settled"
        );
        Some(self.status)
    }

    /// Lines captured when the order was placed.
    #[must_use]
    pub fn order(&self) -> &[CartLine] {
        &self.order
    }

    #[must_use]
    pub const fn status(&self) -> EscrowStatus {
        self.status
    }

    #[must_use]
    pub const fn confirm_at(&self) -> DateTime<Utc> {
        self.confirm_at
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use toolsshare_core::ProductId;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).single().unwrap()
    }

    fn cart_with(ids: &[&str]) -> Cart {
        let mut cart = Cart::new();
        for id in ids {
            cart.add(&ProductId::parse(id).unwrap());
        }
        cart
    }

    #[test]
    fn test_stepper_clamps_at_ends() {
        let mut stepper = CheckoutStepper::new(3);
        assert!(!stepper.prev());
        assert!(stepper.next());
        assert!(stepper.next());
        assert!(stepper.is_last());
        assert!(!stepper.next());
        assert_eq!(stepper.current(), 2);
    }

    #[test]
    fn test_step_statuses() {
        let mut stepper = CheckoutStepper::new(3);
        stepper.next();
        assert_eq!(
            stepper.statuses(),
            vec![StepStatus::Completed, StepStatus::Active, StepStatus::Upcoming]
        );
        assert_eq!(StepStatus::Upcoming.css_class(), None);
    }

    #[test]
    fn test_empty_stepper() {
        let mut stepper = CheckoutStepper::new(0);
        assert!(!stepper.next());
        assert!(stepper.statuses().is_empty());
    }

    #[test]
    fn test_payment_method_fields() {
        assert_eq!(PaymentMethod::visible_fields("card"), Some("card-fields"));
        assert_eq!(PaymentMethod::visible_fields("upi"), Some("upi-fields"));
        assert_eq!(
            PaymentMethod::visible_fields("netbanking"),
            Some("net-banking-fields")
        );
        assert_eq!(PaymentMethod::visible_fields("cash"), None);
    }

    #[test]
    fn test_escrow_confirms_after_delay() {
        let cart = cart_with(&["drill"]);
        let mut tx = EscrowTransaction::begin(cart.lines().to_vec(), t0(), TimeDelta::seconds(3));
        assert_eq!(tx.poll(t0() + TimeDelta::seconds(2), &cart), None);
        assert_eq!(tx.status(), EscrowStatus::Processing);
        assert_eq!(
            tx.poll(t0() + TimeDelta::seconds(3), &cart),
            Some(EscrowStatus::Confirmed)
        );
        // Already settled.
        assert_eq!(tx.poll(t0() + TimeDelta::seconds(4), &cart), None);
    }

    #[test]
    fn test_escrow_confirms_with_extra_items() {
        let ordered = cart_with(&["drill"]);
        let mut tx = EscrowTransaction::begin(ordered.lines().to_vec(), t0(), TimeDelta::seconds(3));
        let grown = cart_with(&["drill", "drill", "saw"]);
        assert_eq!(
            tx.poll(t0() + TimeDelta::seconds(3), &grown),
            Some(EscrowStatus::Confirmed)
        );
    }

    #[test]
    fn test_escrow_cancelled_when_cart_emptied() {
        let ordered = cart_with(&["drill", "drill"]);
        let mut tx = EscrowTransaction::begin(ordered.lines().to_vec(), t0(), TimeDelta::seconds(3));

        assert_eq!(
            tx.poll(t0() + TimeDelta::seconds(3), &Cart::new()),
            Some(EscrowStatus::Cancelled)
        );
        assert_eq!(tx.status(), EscrowStatus::Cancelled);
    }

    #[test]
    fn test_escrow_cancelled_when_quantity_reduced() {
        let ordered = cart_with(&["drill", "drill"]);
        let mut tx = EscrowTransaction::begin(ordered.lines().to_vec(), t0(), TimeDelta::seconds(3));
        assert_eq!(
            tx.poll(t0() + TimeDelta::seconds(3), &cart_with(&["drill"])),
            Some(EscrowStatus::Cancelled)
        );
    }
}
