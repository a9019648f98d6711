//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /browse
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (all stores)
//! GET  /static/*               - Stylesheet
//!
//! # Products
//! GET  /browse                 - Product listing
//! GET  /product                - New product form
//! POST /product                - Add product
//! GET  /product/{id}           - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart page
//! POST /cart/{id}              - Add one unit
//! POST /cart/remove/{id}       - Remove one unit
//! GET  /cart/delete            - Empty the cart
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Order total
//! POST /checkout               - Back to browsing
//! GET  /payment                - Complete checkout
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action (sets token cookie)
//! GET  /register               - Register page
//! POST /register               - Register action
//! POST /logout                 - Logout action
//! ```
//!
//! Anything else, including wrong methods, redirects to `/login`.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod extract;
pub mod health;
pub mod products;

use axum::{
    Router,
    http::Uri,
    middleware::from_fn,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/browse", get(products::browse))
        .route("/product", get(products::new_form).post(products::create))
        .route("/product/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/{id}", post(cart::add))
        .route("/remove/{id}", post(cart::remove))
        .route("/delete", get(cart::delete))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/payment", get(checkout::payment))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(product_routes())
        .nest("/cart", cart_routes())
        .merge(checkout_routes())
        .merge(auth_routes())
}

/// Assemble the complete application: routes, static files, fallback, and
/// the middleware stack.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", static_dir)
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Unknown routes go to the login page.
async fn fallback(uri: Uri) -> Redirect {
    tracing::debug!(%uri, "No route, redirecting to login");
    Redirect::to("/login")
}
