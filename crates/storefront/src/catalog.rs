//! Read-only product catalog.
//!
//! This module loads product and category records from JSON files in the
//! `content/catalog` directory at startup and serves all lookups from
//! memory. The catalog is the source of truth for products; the cart
//! only ever holds references it resolved from here.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use gridline_core::{Category, Product, ProductId};

/// Errors that can occur while loading catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog data in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// In-memory catalog holding all products and categories.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    categories: Arc<Vec<Category>>,
}

impl Catalog {
    /// Load the catalog from `products.json` and `categories.json` in
    /// `catalog_dir`.
    ///
    /// A missing directory yields an empty catalog with a warning rather
    /// than a startup failure, matching how content loading behaves.
    ///
    /// # Errors
    ///
    /// Returns an error if a data file exists but cannot be read or
    /// parsed.
    pub fn load(catalog_dir: &Path) -> Result<Self, CatalogError> {
        if !catalog_dir.exists() {
            tracing::warn!("Catalog directory does not exist: {:?}", catalog_dir);
            return Ok(Self::default());
        }

        let products: Vec<Product> = load_json(&catalog_dir.join("products.json"))?;
        let categories: Vec<Category> = load_json(&catalog_dir.join("categories.json"))?;

        tracing::info!(
            "Loaded catalog: {} products, {} categories",
            products.len(),
            categories.len()
        );

        Ok(Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        })
    }

    /// Build a catalog from in-memory records (used by tests).
    #[must_use]
    pub fn from_records(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories, in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a category by slug.
    #[must_use]
    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Products belonging to the category with `slug`.
    #[must_use]
    pub fn products_in_category(&self, slug: &str) -> Vec<&Product> {
        self.products.iter().filter(|p| p.category == slug).collect()
    }

    /// Case-insensitive substring search over product names and
    /// descriptions.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Read and parse one JSON data file.
fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
        path: path.display().to_string(),
        source,
    })
}
