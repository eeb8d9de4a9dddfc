//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Each session owns one cart, identified by a cart ID stored in the
//! session and persisted as a JSON file under the data directory. Every
//! handler opens the store, applies exactly one operation, and lets the
//! store mirror itself back to disk.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use gridline_core::{Price, ProductId};

use crate::cart::{CartLine, CartStorage, CartStore, JsonFileStorage};
use crate::filters;
use crate::models::session_keys;
use crate::state::AppState;

/// Flat sales tax rate applied at display time (8%).
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            tax: "$0.00".to_string(),
            total: "$0.00".to_string(),
            item_count: 0,
        }
    }

    /// Build display data from a cart store.
    ///
    /// Rounding happens here and only here; the store's subtotal stays
    /// exact.
    pub fn from_store<S: CartStorage>(store: &CartStore<S>) -> Self {
        let subtotal = store.subtotal();
        let tax = Price::new(subtotal.amount() * TAX_RATE);
        Self {
            items: store.lines().map(CartItemView::from).collect(),
            subtotal: subtotal.display(),
            tax: tax.display(),
            total: (subtotal + tax).display(),
            item_count: store.item_count(),
        }
    }
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id.to_string(),
            name: line.product.name.clone(),
            description: line.product.description.clone(),
            image: line.product.image.clone(),
            quantity: line.quantity,
            price: line.product.price.display(),
            line_total: line.line_total().display(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
async fn get_cart_id(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Get the cart ID from the session, minting one if the session has none.
async fn ensure_cart_id(session: &Session) -> String {
    if let Some(cart_id) = get_cart_id(session).await {
        return cart_id;
    }

    let cart_id = Uuid::new_v4().to_string();
    if let Err(e) = session.insert(session_keys::CART_ID, &cart_id).await {
        tracing::error!("Failed to save cart ID to session: {e}");
    }
    cart_id
}

/// Open the session's cart store, rehydrated from its file.
fn open_cart(state: &AppState, cart_id: &str) -> CartStore<JsonFileStorage> {
    CartStore::open(state.cart_storage(cart_id))
}

/// Take the one-shot flash message out of the session.
async fn take_flash(session: &Session) -> Option<String> {
    session
        .remove::<String>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub flash: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = match get_cart_id(&session).await {
        Some(cart_id) => CartView::from_store(&open_cart(&state, &cart_id)),
        None => CartView::empty(),
    };

    let flash = take_flash(&session).await;

    CartShowTemplate { cart, flash }
}

/// Add item to cart (HTMX).
///
/// Resolves the product in the catalog and adds one unit per requested
/// quantity. Returns the cart count badge with an HTMX trigger so other
/// fragments refresh themselves.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let product_id = ProductId::new(form.product_id);
    let Some(product) = state.catalog().product(&product_id).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Html("<span class=\"text-red-500\">Unknown product</span>"),
        )
            .into_response();
    };

    let cart_id = ensure_cart_id(&session).await;
    let mut cart = open_cart(&state, &cart_id);
    for _ in 0..form.quantity.unwrap_or(1).max(1) {
        cart.add_item(product.clone());
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response()
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero removes the line; an unknown product ID leaves the
/// cart unchanged. Either way the current cart items fragment renders.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let mut cart = open_cart(&state, &cart_id);
    cart.update_quantity(&ProductId::new(form.product_id), form.quantity);

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(&cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let Some(cart_id) = get_cart_id(&session).await else {
        return CartItemsTemplate {
            cart: CartView::empty(),
        }
        .into_response();
    };

    let mut cart = open_cart(&state, &cart_id);
    cart.remove_item(&ProductId::new(form.product_id));

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_store(&cart),
        },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    if let Some(cart_id) = get_cart_id(&session).await {
        let mut cart = open_cart(&state, &cart_id);
        cart.clear_cart();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::empty(),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let count = match get_cart_id(&session).await {
        Some(cart_id) => open_cart(&state, &cart_id).item_count(),
        None => 0,
    };

    CartCountTemplate { count }
}

/// Mock checkout: no payment processing exists, so this just confirms
/// intent with a flash message and returns to the cart.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let has_items = match get_cart_id(&session).await {
        Some(cart_id) => !open_cart(&state, &cart_id).is_empty(),
        None => false,
    };

    if has_items {
        let message = "Checkout initiated. Redirecting to checkout process...";
        if let Err(e) = session.insert(session_keys::FLASH, message).await {
            tracing::error!("Failed to set flash message: {e}");
        }
    }

    Redirect::to("/cart").into_response()
}
