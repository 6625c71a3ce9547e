//! Product identifiers.
//!
//! Product ids are assigned by whoever renders the page (they arrive through
//! `data-product-id` attributes) and are opaque to the storefront. The only
//! rules enforced here are the ones that keep persisted state well-formed.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// An opaque, externally assigned product identifier.
///
/// The value is kept exactly as given, so an id read from the page and the
/// same id read back from the store always compare equal. The only rule is
/// that it must contain something other than whitespace.
///
/// ## Examples
///
/// ```
/// use toolsshare_core::ProductId;
///
/// let id = ProductId::parse("drill").unwrap();
/// assert_eq!(id.as_str(), "drill");
///
/// assert!(ProductId::parse("").is_err());
/// assert!(ProductId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Parse a `ProductId` from a string.
    ///
    /// # Errors
    ///
    /// Returns `ProductIdError::Empty` if the input is empty or blank.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        if s.trim().is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(ProductIdError::Empty);
        }
        Ok(Self(value))
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
