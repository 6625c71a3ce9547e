//! Cart line quantities.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing quantity input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is empty or only whitespace.
    #[error("quantity cannot be empty")]
    Empty,
    /// The input is a negative number.
    #[error("quantity cannot be negative")]
    Negative,
    /// The input is larger than the largest supported quantity.
    #[error("quantity must be at most {max}")]
    TooLarge {
        /// Maximum allowed quantity.
        max: u32,
    },
    /// The input is not a whole base-10 number.
    #[error("quantity must be a whole number, got {0:?}")]
    NotANumber(String),
    /// A persisted quantity of zero.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A positive cart line quantity.
///
/// A quantity of zero is not representable; a line whose quantity would drop
/// to zero is removed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add one, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Parse raw quantity input from a form control.
    ///
    /// The input is trimmed and must be a base-10 integer in `0..=u32::MAX`.
    /// Returns `Ok(None)` for zero, which callers treat as "remove the line".
    ///
    /// # Errors
    ///
    /// Returns an error for empty, negative, fractional, non-numeric or
    /// out-of-range input.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolsshare_core::Quantity;
    ///
    /// assert_eq!(Quantity::parse_input(" 3 ").unwrap().map(Quantity::get), Some(3));
    /// assert_eq!(Quantity::parse_input("0").unwrap(), None);
    /// assert!(Quantity::parse_input("abc").is_err());
    /// ```
    pub fn parse_input(raw: &str) -> Result<Option<Self>, QuantityError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(QuantityError::Empty);
        }

        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

        if let Some(rest) = digits.strip_prefix('-') {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(QuantityError::Negative);
            }
            return Err(QuantityError::NotANumber(trimmed.to_owned()));
        }

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QuantityError::NotANumber(trimmed.to_owned()));
        }

        let value = digits
            .parse::<u32>()
            .map_err(|_| QuantityError::TooLarge { max: u32::MAX })?;

        Ok(Self::new(value))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(QuantityError::Zero)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}
