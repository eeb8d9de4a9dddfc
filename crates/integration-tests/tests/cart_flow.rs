//! Integration tests for the cart over HTTP.
//!
//! Each test drives the real router: add/update/remove/clear mutate the
//! session's cart file on disk and the rendered fragments reflect the
//! derived totals.

use axum::http::{StatusCode, header};
use gridline_integration_tests::{TestApp, body_text, session_cookie};

#[tokio::test]
async fn cart_count_starts_at_zero() {
    let app = TestApp::spawn();

    let response = app.get("/cart/count", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("(0)"));
}

#[tokio::test]
async fn adding_same_product_twice_increments_one_line() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("add should start a session");
    assert!(body_text(response).await.contains("(1)"));

    let response = app
        .post_form("/cart/add", "product_id=1", Some(&cookie))
        .await;
    assert!(body_text(response).await.contains("(2)"));

    // One line of two units at $89.99
    let page = body_text(app.get("/cart", Some(&cookie)).await).await;
    assert!(page.contains("$179.98"));
    assert!(page.contains("2 items ready for checkout"));
}

#[tokio::test]
async fn update_quantity_rewrites_totals() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = session_cookie(&response).expect("session cookie");
    app.post_form("/cart/add", "product_id=1", Some(&cookie))
        .await;

    let response = app
        .post_form("/cart/update", "product_id=1&quantity=1", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fragment = body_text(response).await;
    assert!(fragment.contains("$89.99"));
    assert!(!fragment.contains("$179.98"));
}

#[tokio::test]
async fn update_quantity_to_zero_removes_the_line() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let response = app
        .post_form("/cart/update", "product_id=1&quantity=0", Some(&cookie))
        .await;
    assert!(body_text(response).await.contains("Your cart is empty"));

    let count = body_text(app.get("/cart/count", Some(&cookie)).await).await;
    assert!(count.contains("(0)"));
}

#[tokio::test]
async fn updating_unknown_product_is_a_noop() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let response = app
        .post_form("/cart/update", "product_id=999&quantity=5", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let count = body_text(app.get("/cart/count", Some(&cookie)).await).await;
    assert!(count.contains("(1)"));
}

#[tokio::test]
async fn remove_then_remove_again_is_idempotent() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=2", None).await;
    let cookie = session_cookie(&response).expect("session cookie");

    for _ in 0..2 {
        let response = app
            .post_form("/cart/remove", "product_id=2", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Your cart is empty"));
    }
}

#[tokio::test]
async fn clear_empties_a_multi_line_cart() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = session_cookie(&response).expect("session cookie");
    app.post_form("/cart/add", "product_id=10", Some(&cookie))
        .await;

    let response = app.post_form("/cart/clear", "", Some(&cookie)).await;
    assert!(body_text(response).await.contains("Your cart is empty"));

    let count = body_text(app.get("/cart/count", Some(&cookie)).await).await;
    assert!(count.contains("(0)"));
}

#[tokio::test]
async fn adding_unknown_product_is_rejected() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=does-not-exist", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn out_of_stock_product_can_be_force_added() {
    // The store performs no stock validation; the UI gate is the only
    // thing standing between an out-of-stock product and the cart.
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=4", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("(1)"));
}

#[tokio::test]
async fn mixed_cart_totals_follow_each_mutation() {
    let app = TestApp::spawn();

    // $89.99 + $44.99
    let response = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = session_cookie(&response).expect("session cookie");
    app.post_form("/cart/add", "product_id=10", Some(&cookie))
        .await;

    let page = body_text(app.get("/cart", Some(&cookie)).await).await;
    assert!(page.contains("$134.98"));

    // Three caps instead of one: $89.99 + 3 * $44.99 = $224.96
    let fragment = body_text(
        app.post_form("/cart/update", "product_id=10&quantity=3", Some(&cookie))
            .await,
    )
    .await;
    assert!(fragment.contains("$224.96"));
}

#[tokio::test]
async fn cart_persists_across_requests_in_same_session() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=14", None).await;
    let cookie = session_cookie(&response).expect("session cookie");

    // Every later request reopens the store from its file
    for _ in 0..3 {
        let count = body_text(app.get("/cart/count", Some(&cookie)).await).await;
        assert!(count.contains("(1)"));
    }
}

#[tokio::test]
async fn checkout_flashes_and_returns_to_cart() {
    let app = TestApp::spawn();

    let response = app.post_form("/cart/add", "product_id=1", None).await;
    let cookie = session_cookie(&response).expect("session cookie");

    let response = app.get("/checkout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.to_str().ok()),
        Some(Some("/cart"))
    );

    let page = body_text(app.get("/cart", Some(&cookie)).await).await;
    assert!(page.contains("Checkout initiated"));

    // Flash is one-shot
    let page = body_text(app.get("/cart", Some(&cookie)).await).await;
    assert!(!page.contains("Checkout initiated"));
}

#[tokio::test]
async fn checkout_with_empty_cart_skips_the_flash() {
    let app = TestApp::spawn();

    let response = app.get("/checkout", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = body_text(app.get("/cart", None).await).await;
    assert!(!page.contains("Checkout initiated"));
}
