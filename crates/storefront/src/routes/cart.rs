//! Cart route handlers.
//!
//! Every cart route requires a valid session token; the cart is keyed by
//! the token's username.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use tracing::instrument;

use corner_store_core::Product;

use super::extract::PathProductId;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::{CartService, CheckoutSummary, StoreError};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Group resolved cart products into lines.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` if the cart total overflows.
    pub fn from_products(products: &[Product]) -> std::result::Result<Self, StoreError> {
        CheckoutSummary::from_products(products).map(Self::from_summary)
    }

    /// Build the view from a priced summary.
    #[must_use]
    pub fn from_summary(summary: CheckoutSummary) -> Self {
        Self {
            items: summary
                .lines
                .into_iter()
                .map(|line| CartItemView {
                    id: line.product.id.as_i64(),
                    price: line.product.cost.display(),
                    name: line.product.name,
                    quantity: line.quantity,
                    line_price: line.line_total.display(),
                })
                .collect(),
            subtotal: summary.total.display(),
            item_count: summary.item_count,
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub current_user: Option<String>,
    pub cart: CartView,
}

/// GET /cart - the user's cart.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CartTemplate> {
    let products = CartService::from_databases(state.db())
        .get(&user.username)
        .await?;

    Ok(CartTemplate {
        current_user: Some(user.username.to_string()),
        cart: CartView::from_products(&products)?,
    })
}

/// POST /cart/{id} - add one unit of a product.
#[instrument(skip_all, fields(username = %user.username, product_id = %id.0))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    id: PathProductId,
) -> Result<Redirect> {
    CartService::from_databases(state.db())
        .add(&user.username, id.0)
        .await?;
    Ok(Redirect::to("/cart"))
}

/// POST /cart/remove/{id} - remove one unit of a product.
#[instrument(skip_all, fields(username = %user.username, product_id = %id.0))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    id: PathProductId,
) -> Result<Redirect> {
    CartService::from_databases(state.db())
        .remove(&user.username, id.0)
        .await?;
    Ok(Redirect::to("/cart"))
}

/// GET /cart/delete - empty the cart.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Redirect> {
    CartService::from_databases(state.db())
        .delete(&user.username)
        .await?;
    Ok(Redirect::to("/cart"))
}
