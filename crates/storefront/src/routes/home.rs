//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};

use crate::filters;
use crate::routes::categories::CategoryView;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub featured_products: Vec<ProductView>,
    pub categories: Vec<CategoryView>,
}

/// Display home page with featured products and the category grid.
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured_products = state
        .catalog()
        .products()
        .iter()
        .filter(|p| p.in_stock)
        .take(FEATURED_COUNT)
        .map(ProductView::from)
        .collect();

    let categories = state
        .catalog()
        .categories()
        .iter()
        .map(CategoryView::from)
        .collect();

    HomeTemplate {
        featured_products,
        categories,
    }
}
