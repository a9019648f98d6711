//! Integration test harness for Corner Store.
//!
//! Tests drive the full storefront router in-process with
//! `tower::ServiceExt::oneshot`, backed by in-memory `SQLite` stores, so no
//! server or database files are needed:
//!
//! ```bash
//! cargo test -p corner-store-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tower::ServiceExt;

use corner_store_core::{NewProduct, Price, Product};
use corner_store_storefront::config::{DatabaseUrls, StorefrontConfig};
use corner_store_storefront::db::Databases;
use corner_store_storefront::services::ProductService;
use corner_store_storefront::{AppState, app};

/// Secret the test application signs tokens with.
pub const TEST_SECRET: &str = "integration-secret-5d1c8a0e7f3b2946";

/// Configuration for an in-process storefront.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost".to_string(),
        databases: DatabaseUrls::default(),
        jwt_secret: SecretString::from(TEST_SECRET.to_string()),
        token_ttl_hours: 1,
        debug: false,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A storefront router over fresh in-memory stores.
pub struct TestContext {
    pub state: AppState,
    router: Router,
}

impl TestContext {
    /// Build an application with empty, migrated stores.
    pub async fn new() -> Self {
        let databases = Databases::in_memory().await.unwrap();
        let state = AppState::new(test_config(), databases);
        let router = app(state.clone());
        Self { state, router }
    }

    /// Send a request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET `uri`, optionally with a `Cookie` header.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// POST a URL-encoded form to `uri`, optionally with a `Cookie` header.
    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_owned())).unwrap())
            .await
    }

    /// Register an account through `POST /register`.
    pub async fn register(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/register",
            &format!("username={username}&password={password}"),
            None,
        )
        .await
    }

    /// Register and log in, returning the `token=...` cookie pair.
    pub async fn sign_in(&self, username: &str, password: &str) -> String {
        let registered = self.register(username, password).await;
        assert_eq!(registered.status(), StatusCode::SEE_OTHER);

        let response = self
            .post_form(
                "/login",
                &format!("username={username}&password={password}"),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        token_cookie(&response).unwrap()
    }

    /// Insert a product directly through the product service.
    pub async fn add_product(&self, name: &str, cents: i64, qty: i64) -> Product {
        let product = NewProduct::new(
            name,
            format!("{name} for testing"),
            Price::new(Decimal::new(cents, 2)),
            qty,
        )
        .unwrap();
        ProductService::new(&self.state.db().products)
            .add(&product)
            .await
            .unwrap()
    }
}

/// The `token=...` pair from a response's `Set-Cookie` header.
#[must_use]
pub fn token_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("token="))
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Read a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
