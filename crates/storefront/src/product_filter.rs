//! Category page product filtering.

use rust_decimal::Decimal;
use toolsshare_core::ProductId;

/// Value meaning "no restriction" for select-style filters.
const ANY: &str = "all";

/// The filterable attributes of a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub category: String,
    pub price: Decimal,
    pub condition: String,
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// Parse a `min-max` range such as `50-200`.
    ///
    /// Both bounds are required. A half-open value like `500-` does not
    /// parse, so it restricts nothing rather than acting as an upper bound
    /// of zero.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (min, max) = raw.split_once('-')?;
        let min = min.trim().parse::<Decimal>().ok()?;
        let max = max.trim().parse::<Decimal>().ok()?;
        Some(Self { min, max })
    }

    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

/// Current filter form selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    pub condition: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from the filter form's name/value pairs.
    ///
    /// Empty values and `all` mean no restriction. A price range that does
    /// not parse is ignored.
    pub fn from_form<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut criteria = Self::default();
        for (name, value) in pairs {
            match name {
                "category" => criteria.category = restriction(value),
                "condition" => criteria.condition = restriction(value),
                "priceRange" if !value.is_empty() => {
                    criteria.price_range = PriceRange::parse(value);
                    if criteria.price_range.is_none() {
                        tracing::debug!(value, "ignoring unparsable price range");
                    }
                }
                _ => {}
            }
        }
        criteria
    }

    /// Whether `card` passes every active filter.
    #[must_use]
    pub fn matches(&self, card: &ProductCard) -> bool {
        self.category.as_ref().is_none_or(|c| *c == card.category)
            && self.price_range.is_none_or(|r| r.contains(card.price))
            && self.condition.as_ref().is_none_or(|c| *c == card.condition)
    }
}

fn restriction(value: &str) -> Option<String> {
    (!value.is_empty() && value != ANY).then(|| value.to_string())
}

/// Which cards to show after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// Visible cards, in grid order.
    pub visible: Vec<ProductId>,
    /// Whether the "no products match" state is shown.
    pub show_empty_state: bool,
}

/// Apply `criteria` to every card in the grid.
#[must_use]
pub fn apply_filters(cards: &[ProductCard], criteria: &FilterCriteria) -> FilterResult {
    let visible: Vec<ProductId> = cards
        .iter()
        .filter(|card| criteria.matches(card))
        .map(|card| card.id.clone())
        .collect();
    FilterResult {
        show_empty_state: visible.is_empty(),
        visible,
    }
}
