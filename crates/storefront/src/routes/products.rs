//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use corner_store_core::{NewProduct, Product};

use super::extract::PathProductId;
use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::services::ProductService;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub qty: i64,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i64(),
            price: product.cost.display(),
            name: product.name,
            description: product.description,
            qty: product.qty,
        }
    }
}

/// New product form data.
///
/// Every field is optional so that missing fields are reported together
/// instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    pub product_name: Option<String>,
    pub product_cost: Option<String>,
    pub product_quantity: Option<String>,
    pub product_description: Option<String>,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "browse.html")]
pub struct BrowseTemplate {
    pub current_user: Option<String>,
    pub products: Vec<ProductView>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product/show.html")]
pub struct ProductTemplate {
    pub current_user: Option<String>,
    pub product: ProductView,
}

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "product/new.html")]
pub struct NewProductTemplate {
    pub current_user: Option<String>,
    pub error: Option<String>,
    pub name: String,
    pub cost: String,
    pub quantity: String,
    pub description: String,
}

/// GET / - send visitors to the catalog.
pub async fn index() -> Redirect {
    Redirect::to("/browse")
}

/// GET /browse - all products ordered by name.
#[instrument(skip(state, auth))]
pub async fn browse(State(state): State<AppState>, auth: OptionalAuth) -> Result<BrowseTemplate> {
    let products = ProductService::new(&state.db().products).list().await?;

    Ok(BrowseTemplate {
        current_user: username_of(&auth),
        products: products.into_iter().map(ProductView::from).collect(),
    })
}

/// GET /product/{id} - product detail.
#[instrument(skip_all, fields(product_id = %id.0))]
pub async fn show(
    State(state): State<AppState>,
    auth: OptionalAuth,
    id: PathProductId,
) -> Result<ProductTemplate> {
    let product = ProductService::new(&state.db().products).get(id.0).await?;

    Ok(ProductTemplate {
        current_user: username_of(&auth),
        product: product.into(),
    })
}

/// GET /product - new product form.
pub async fn new_form(auth: OptionalAuth) -> NewProductTemplate {
    NewProductTemplate {
        current_user: username_of(&auth),
        error: None,
        name: String::new(),
        cost: String::new(),
        quantity: String::new(),
        description: String::new(),
    }
}

/// POST /product - add a product and show it.
///
/// Invalid input re-renders the form with the submitted values and a 400.
#[instrument(skip(state, auth, form))]
pub async fn create(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let parsed = NewProduct::parse(
        form.product_name.as_deref(),
        form.product_description.as_deref(),
        form.product_cost.as_deref(),
        form.product_quantity.as_deref(),
    );

    let new_product = match parsed {
        Ok(product) => product,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected product form");
            let page = NewProductTemplate {
                current_user: username_of(&auth),
                error: Some(e.to_string()),
                name: form.product_name.unwrap_or_default(),
                cost: form.product_cost.unwrap_or_default(),
                quantity: form.product_quantity.unwrap_or_default(),
                description: form.product_description.unwrap_or_default(),
            };
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let product = ProductService::new(&state.db().products)
        .add(&new_product)
        .await?;

    Ok(Redirect::to(&format!("/product/{}", product.id)).into_response())
}

fn username_of(auth: &OptionalAuth) -> Option<String> {
    auth.0.as_ref().map(|user| user.username.to_string())
}
