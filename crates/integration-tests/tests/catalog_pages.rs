//! Integration tests for catalog browsing pages.

use axum::http::StatusCode;
use gridline_integration_tests::{TestApp, body_text};

#[tokio::test]
async fn home_page_shows_categories_and_featured_gear() {
    let app = TestApp::spawn();

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("GRIDLINE"));
    assert!(page.contains("Racing Tees"));
    assert!(page.contains("Featured Gear"));
}

#[tokio::test]
async fn product_listing_shows_the_whole_catalog() {
    let app = TestApp::spawn();

    let page = body_text(app.get("/products", None).await).await;
    assert!(page.contains("Monaco Grand Prix Tee"));
    assert!(page.contains("Chequered Flag Snapback"));
}

#[tokio::test]
async fn product_search_filters_by_substring() {
    let app = TestApp::spawn();

    let page = body_text(app.get("/products?q=snapback", None).await).await;
    assert!(page.contains("Chequered Flag Snapback"));
    assert!(!page.contains("Monaco Grand Prix Tee"));
}

#[tokio::test]
async fn product_search_matches_descriptions_case_insensitively() {
    let app = TestApp::spawn();

    // "Silverstone" appears in a product description
    let page = body_text(app.get("/products?q=SILVERSTONE", None).await).await;
    assert!(page.contains("Silverstone Racing Shirt"));
}

#[tokio::test]
async fn fruitless_search_offers_to_clear() {
    let app = TestApp::spawn();

    let page = body_text(app.get("/products?q=zzzzz", None).await).await;
    assert!(page.contains("No products found"));
    assert!(page.contains("Clear Search"));
}

#[tokio::test]
async fn product_detail_shows_price_and_related_items() {
    let app = TestApp::spawn();

    let response = app.get("/products/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("Monaco Grand Prix Tee"));
    assert!(page.contains("$89.99"));
    assert!(page.contains("You might also like"));
}

#[tokio::test]
async fn out_of_stock_product_renders_disabled_gate() {
    let app = TestApp::spawn();

    let page = body_text(app.get("/products/4", None).await).await;
    assert!(page.contains("Out of Stock"));
    assert!(!page.contains("hx-post=\"/cart/add\""));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let app = TestApp::spawn();

    let response = app.get("/products/does-not-exist", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_page_lists_only_its_products() {
    let app = TestApp::spawn();

    let page = body_text(app.get("/categories/racing-caps", None).await).await;
    assert!(page.contains("Paddock Club Dad Hat"));
    assert!(!page.contains("Apex Windbreaker"));
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let app = TestApp::spawn();

    let response = app.get("/categories/go-karts", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_path_renders_the_404_page() {
    let app = TestApp::spawn();

    let response = app.get("/pit-wall", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("wrong turn"));
}
