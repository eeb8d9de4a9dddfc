//! Shared domain types.

pub mod catalog;
pub mod id;
pub mod price;

pub use catalog::{Category, Product};
pub use id::{CategoryId, ProductId};
pub use price::Price;
