//! Integration tests for Gridline.
//!
//! The tests drive the storefront router in-process with
//! `tower::ServiceExt::oneshot` - no listening socket, no external
//! services. Each [`TestApp`] gets its own temporary data directory for
//! persisted carts and loads the real bundled catalog, so the tests
//! exercise the same code paths the binary serves.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use tempfile::TempDir;
use tower::ServiceExt;

use gridline_storefront::catalog::Catalog;
use gridline_storefront::config::StorefrontConfig;
use gridline_storefront::middleware::create_session_layer;
use gridline_storefront::routes;
use gridline_storefront::state::AppState;

/// Maximum response body size the tests will buffer.
const BODY_LIMIT: usize = 1024 * 1024;

/// An in-process storefront wired exactly like the binary.
pub struct TestApp {
    router: Router,
    // Held so the per-test cart directory outlives the router
    _data_dir: TempDir,
}

impl TestApp {
    /// Build a fresh app with the bundled catalog and an empty cart
    /// directory.
    ///
    /// # Panics
    ///
    /// Panics if the catalog data cannot be loaded.
    #[must_use]
    pub fn spawn() -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp data dir");

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid address"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            content_dir: storefront_content_dir(),
            data_dir: data_dir.path().to_path_buf(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let catalog = Catalog::load(&config.catalog_dir()).expect("Failed to load catalog");
        let state = AppState::new(config.clone(), catalog);
        let session_layer = create_session_layer(&config);

        let router = routes::routes()
            .layer(session_layer)
            .with_state(state);

        Self {
            router,
            _data_dir: data_dir,
        }
    }

    /// Send a GET request, optionally with a session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be dispatched.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("Failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed")
    }

    /// Send a form POST, optionally with a session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be dispatched.
    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = builder
            .body(Body::from(body.to_owned()))
            .expect("Failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed")
    }
}

/// Path to the storefront crate's bundled content directory.
fn storefront_content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/content")
}

/// Extract the session cookie pair from a response, if one was set.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    Some(set_cookie.split(';').next()?.trim().to_owned())
}

/// Buffer a response body into a string.
///
/// # Panics
///
/// Panics if the body cannot be collected or is not UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .expect("Failed to collect body");
    String::from_utf8(bytes.to_vec()).expect("Body was not UTF-8")
}
