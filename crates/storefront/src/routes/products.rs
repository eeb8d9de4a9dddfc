//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use gridline_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    /// Free-text search over product names and descriptions.
    #[serde(default)]
    pub q: String,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub query: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub related_products: Vec<ProductView>,
}

/// Display product listing page, optionally filtered by search query.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let products = state
        .catalog()
        .search(&query.q)
        .into_iter()
        .map(ProductView::from)
        .collect();

    ProductsIndexTemplate {
        products,
        query: query.q,
    }
}

/// Display product detail page.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(id);
    let product = state
        .catalog()
        .product(&product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    // Other products from the same rack
    let related_products = state
        .catalog()
        .products_in_category(&product.category)
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(4)
        .map(ProductView::from)
        .collect();

    Ok(ProductShowTemplate {
        product: ProductView::from(product),
        related_products,
    })
}
