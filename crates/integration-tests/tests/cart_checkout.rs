//! End-to-end cart and checkout flows through the HTTP layer.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use corner_store_core::Username;
use corner_store_integration_tests::{TestContext, body_text, location};
use corner_store_storefront::services::CartService;

// =============================================================================
// Helpers
// =============================================================================

async fn cart_ids(ctx: &TestContext, username: &str) -> Vec<i64> {
    let username = Username::parse(username).unwrap();
    CartService::from_databases(ctx.state.db())
        .contents(&username)
        .await
        .unwrap()
        .into_iter()
        .map(|id| id.as_i64())
        .collect()
}

// =============================================================================
// Cart Tests
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_records_product() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    let lamp = ctx.add_product("Lamp", 1999, 3).await;

    let response = ctx
        .post_form(&format!("/cart/{}", lamp.id), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/cart"));

    assert_eq!(cart_ids(&ctx, "alice").await, [lamp.id.as_i64()]);

    let page = body_text(ctx.get("/cart", Some(&cookie)).await).await;
    assert!(page.contains("Lamp"));
    assert!(page.contains("$19.99"));
}

#[tokio::test]
async fn test_remove_takes_one_unit() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    let pen = ctx.add_product("Pen", 150, 10).await;
    let add = format!("/cart/{}", pen.id);

    ctx.post_form(&add, "", Some(&cookie)).await;
    ctx.post_form(&add, "", Some(&cookie)).await;

    let response = ctx
        .post_form(&format!("/cart/remove/{}", pen.id), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(cart_ids(&ctx, "alice").await, [pen.id.as_i64()]);
}

#[tokio::test]
async fn test_delete_empties_cart() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    let pen = ctx.add_product("Pen", 150, 10).await;
    ctx.post_form(&format!("/cart/{}", pen.id), "", Some(&cookie))
        .await;

    let response = ctx.get("/cart/delete", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(cart_ids(&ctx, "alice").await.is_empty());

    let page = body_text(ctx.get("/cart", Some(&cookie)).await).await;
    assert!(page.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let ctx = TestContext::new().await;
    let alice = ctx.sign_in("alice", "correct-horse").await;
    let bob = ctx.sign_in("bob", "battery-staple").await;
    let pen = ctx.add_product("Pen", 150, 10).await;

    ctx.post_form(&format!("/cart/{}", pen.id), "", Some(&alice))
        .await;

    assert_eq!(cart_ids(&ctx, "alice").await, [pen.id.as_i64()]);
    assert!(cart_ids(&ctx, "bob").await.is_empty());
    let page = body_text(ctx.get("/cart", Some(&bob)).await).await;
    assert!(!page.contains("Pen"));
}

#[tokio::test]
async fn test_non_positive_cart_id_is_bad_request() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;

    let response = ctx.post_form("/cart/0", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(cart_ids(&ctx, "alice").await.is_empty());
}

// =============================================================================
// Checkout Tests
// =============================================================================

#[tokio::test]
async fn test_checkout_shows_total() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    let mug = ctx.add_product("Mug", 1000, 5).await;
    let tea = ctx.add_product("Tea", 350, 5).await;

    for id in [mug.id, mug.id, tea.id] {
        ctx.post_form(&format!("/cart/{id}"), "", Some(&cookie)).await;
    }

    let response = ctx.get("/checkout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("$23.50"));
}

#[tokio::test]
async fn test_checkout_post_returns_to_browse() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;

    let response = ctx.post_form("/checkout", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/browse"));
}

#[tokio::test]
async fn test_payment_clears_cart_but_not_stock() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    let mug = ctx.add_product("Mug", 1000, 5).await;
    ctx.post_form(&format!("/cart/{}", mug.id), "", Some(&cookie))
        .await;

    let response = ctx.get("/payment", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("$10.00"));
    assert!(page.contains("pay_"));

    assert!(cart_ids(&ctx, "alice").await.is_empty());
    let detail = body_text(ctx.get(&format!("/product/{}", mug.id), None).await).await;
    assert!(detail.contains("5 in stock"));
}

#[tokio::test]
async fn test_payment_with_empty_cart_charges_nothing() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;

    let page = body_text(ctx.get("/payment", Some(&cookie)).await).await;
    assert!(page.contains("nothing was charged"));
}

#[tokio::test]
async fn test_deleted_product_drops_out_of_cart_view() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    let gone = ctx.add_product("Discontinued", 500, 1).await;
    let kept = ctx.add_product("Keeper", 700, 1).await;
    for id in [gone.id, kept.id] {
        ctx.post_form(&format!("/cart/{id}"), "", Some(&cookie)).await;
    }

    corner_store_storefront::services::ProductService::new(&ctx.state.db().products)
        .delete(gone.id)
        .await
        .unwrap();

    let page = body_text(ctx.get("/checkout", Some(&cookie)).await).await;
    assert!(!page.contains("Discontinued"));
    assert!(page.contains("$7.00"));
}

#[tokio::test]
async fn test_overflowing_cart_total_is_a_bad_request() {
    let ctx = TestContext::new().await;
    let cookie = ctx.sign_in("alice", "correct-horse").await;
    // Stored directly; the product form caps costs well below this.
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO products (name, description, cost, qty) VALUES ('Yacht', '', ?, 1) RETURNING id",
    )
    .bind(5e28_f64)
    .fetch_one(&ctx.state.db().products)
    .await
    .unwrap();

    let add = format!("/cart/{id}");
    ctx.post_form(&add, "", Some(&cookie)).await;
    ctx.post_form(&add, "", Some(&cookie)).await;

    for page in ["/cart", "/checkout", "/payment"] {
        let response = ctx.get(page, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{page}");
    }
    assert_eq!(cart_ids(&ctx, "alice").await, [id, id]);
}
