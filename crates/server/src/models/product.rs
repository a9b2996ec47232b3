//! Product domain types.

use pricewatch_core::ProductId;

/// A product (domain type).
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product title, unique across all products by domain rule.
    pub title: String,
    /// Current price, non-negative.
    pub price: f64,
}

/// Optional filters for a single-product lookup.
///
/// Absent fields do not constrain the query; supplied fields are ANDed.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub id: Option<ProductId>,
    pub title: Option<String>,
}

impl ProductFilter {
    /// Filter by product ID only.
    #[must_use]
    pub const fn by_id(id: ProductId) -> Self {
        Self {
            id: Some(id),
            title: None,
        }
    }

    /// Filter by title only.
    #[must_use]
    pub fn by_title(title: &str) -> Self {
        Self {
            id: None,
            title: Some(title.to_owned()),
        }
    }
}
