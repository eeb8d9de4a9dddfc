//! Product and category records.
//!
//! These are the read-only records supplied by the catalog data files.
//! The cart references products by shared, immutable value - nothing in
//! the storefront ever mutates a `Product` after load.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Primary image URL.
    pub image: String,
    /// Slug of the category this product belongs to.
    pub category: String,
    /// Short marketing description.
    pub description: String,
    /// Whether the product is currently purchasable through the UI.
    pub in_stock: bool,
}

/// A catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug (e.g., "racing-tees").
    pub slug: String,
    /// Category image URL.
    pub image: String,
}
