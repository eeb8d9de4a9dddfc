//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use gridline_core::Category;

use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub slug: String,
    pub image: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            image: category.image.clone(),
        }
    }
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<CategoryView>,
}

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: CategoryView,
    pub products: Vec<ProductView>,
}

/// Display category listing page.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    CategoriesIndexTemplate {
        categories: state
            .catalog()
            .categories()
            .iter()
            .map(CategoryView::from)
            .collect(),
    }
}

/// Display one category and its products.
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let category = state
        .catalog()
        .category(&slug)
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let products = state
        .catalog()
        .products_in_category(&slug)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(CategoryShowTemplate {
        category: CategoryView::from(category),
        products,
    })
}
