//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use tracing::instrument;

use super::cart::CartView;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::CheckoutService;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub current_user: Option<String>,
    pub cart: CartView,
    pub total: String,
}

/// Payment confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub current_user: Option<String>,
    pub total: String,
    pub item_count: u32,
    pub reference: Option<String>,
}

/// GET /checkout - show the cart total.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<CheckoutTemplate> {
    let summary = CheckoutService::new(state.db())
        .checkout(&user.username)
        .await?;
    let cart = CartView::from_summary(summary);

    Ok(CheckoutTemplate {
        current_user: Some(user.username.to_string()),
        total: cart.subtotal.clone(),
        cart,
    })
}

/// POST /checkout - back to the catalog.
pub async fn submit(RequireAuth(_user): RequireAuth) -> Redirect {
    Redirect::to("/browse")
}

/// GET /payment - take payment and clear the cart.
#[instrument(skip_all, fields(username = %user.username))]
pub async fn payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<PaymentTemplate> {
    let receipt = CheckoutService::new(state.db())
        .complete_checkout(&user.username)
        .await?;

    Ok(PaymentTemplate {
        current_user: Some(user.username.to_string()),
        total: receipt.summary.total.display(),
        item_count: receipt.summary.item_count,
        reference: receipt.payment.map(|payment| payment.reference),
    })
}
