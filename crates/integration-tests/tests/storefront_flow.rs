//! End-to-end storefront flows over HTTP.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use testhive_integration_tests::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start().await;
    let response = ctx
        .client
        .get(format!("{}/health", ctx.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_login_reaches_products() {
    let ctx = TestContext::start().await;
    assert_eq!(ctx.state().await["screen"], "login");

    let state = ctx.login().await;
    assert_eq!(state["screen"], "products");
    assert_eq!(state["user"]["username"], "devicelab");
    assert_eq!(state["categories"][0], "All");
    assert_eq!(state["products"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn test_cart_totals() {
    let ctx = TestContext::start().await;
    ctx.login().await;

    ctx.ok(json!({"type": "add_to_cart", "id": "Appium"})).await;
    let state = ctx.ok(json!({"type": "add_to_cart", "id": "Appium"})).await;
    assert_eq!(state["cart"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(state["cart"]["lines"][0]["quantity"], 2);
    assert_eq!(state["cart"]["total"], "$15.00");

    let state = ctx.ok(json!({"type": "add_to_cart", "id": "Espresso"})).await;
    assert_eq!(state["cart"]["total"], "$16.50");
    assert_eq!(state["cart"]["itemCount"], 3);
    assert_eq!(state["header"]["cartBadge"], 3);

    let state = ctx.ok(json!({"type": "remove_from_cart", "id": "Appium"})).await;
    assert_eq!(state["cart"]["total"], "$9.00");
}

#[tokio::test]
async fn test_checkout_round_trip() {
    let ctx = TestContext::start().await;
    ctx.login().await;
    ctx.ok(json!({"type": "add_to_cart", "id": "Appium"})).await;
    ctx.ok(json!({"type": "add_to_cart", "id": "Appium"})).await;
    ctx.ok(json!({"type": "add_to_cart", "id": "Espresso"})).await;

    ctx.ok(json!({"type": "go_to_cart"})).await;
    let state = ctx.ok(json!({"type": "checkout"})).await;
    assert_eq!(state["screen"], "address");

    let state = ctx
        .ok(json!({"type": "submit_address", "address": "1 Main St", "city": "Austin", "zip": "73301"}))
        .await;
    assert_eq!(state["screen"], "payment");
    assert_eq!(state["shipping"]["city"], "Austin");

    let state = ctx.ok(json!({"type": "go_back"})).await;
    assert_eq!(state["screen"], "address");
    assert_eq!(state["draft"]["address"], "1 Main St");

    ctx.ok(json!({"type": "submit_address", "address": "1 Main St", "city": "Austin", "zip": "73301"}))
        .await;
    let state = ctx.ok(json!({"type": "submit_payment", "card": "4111 1111 1111 1111"})).await;
    assert_eq!(state["screen"], "checkoutSuccess");
    assert_eq!(state["total"], "$16.50");
    assert_eq!(state["itemCount"], 3);
    assert_eq!(state["cardLastFour"], "1111");
    assert!(state["orderNumber"].as_str().unwrap().starts_with('#'));
    assert_eq!(state["cart"]["itemCount"], 0);

    let state = ctx.ok(json!({"type": "continue_shopping"})).await;
    assert_eq!(state["screen"], "products");
    assert_eq!(state["cart"]["total"], "$0.00");
}

#[tokio::test]
async fn test_logout_needs_confirmation() {
    let ctx = TestContext::start().await;
    ctx.login().await;
    ctx.ok(json!({"type": "add_to_cart", "id": "Jest"})).await;

    let state = ctx.ok(json!({"type": "logout"})).await;
    assert_eq!(state["screen"], "products");

    let state = ctx.ok(json!({"type": "logout", "confirmed": true})).await;
    assert_eq!(state["screen"], "login");
    assert!(state["user"].is_null());
    assert!(state["header"].is_null());
    assert_eq!(state["cart"]["itemCount"], 0);
}

#[tokio::test]
async fn test_search_and_category() {
    let ctx = TestContext::start().await;
    ctx.login().await;

    let state = ctx.ok(json!({"type": "set_search_query", "text": "javascript"})).await;
    let ids: Vec<&str> = state["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["Jest", "Mocha"]);

    let state = ctx.ok(json!({"type": "set_category", "name": "Web Testing"})).await;
    assert!(state["products"].as_array().unwrap().is_empty());
    assert_eq!(state["category"], "Web Testing");
}
