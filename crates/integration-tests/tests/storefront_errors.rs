//! Error statuses and bodies from `POST /intents`.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use testhive_integration_tests::TestContext;

#[tokio::test]
async fn test_invalid_credentials() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx
        .intent(json!({"type": "login", "username": "devicelab", "password": "wrong"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let state = ctx.state().await;
    assert_eq!(state["screen"], "login");
    assert_eq!(state["lastError"]["kind"], "invalid_credentials");
    assert_eq!(state["lastError"]["screen"], "login");
}

#[tokio::test]
async fn test_blank_field_names_the_field() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx
        .intent(json!({"type": "login", "username": "", "password": "robustest"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Username is required");
}

#[tokio::test]
async fn test_out_of_stock_leaves_cart_alone() {
    let ctx = TestContext::start().await;
    ctx.login().await;
    ctx.ok(json!({"type": "add_to_cart", "id": "Selenium"})).await;

    let (status, body) = ctx
        .intent(json!({"type": "add_to_cart", "id": "Playwright"}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "out_of_stock");

    let state = ctx.state().await;
    assert_eq!(state["cart"]["total"], "$2.30");
    assert_eq!(state["lastError"]["kind"], "out_of_stock");
}

#[tokio::test]
async fn test_error_cleared_by_next_intent() {
    let ctx = TestContext::start().await;
    let _ = ctx
        .intent(json!({"type": "login", "username": "a", "password": "b"}))
        .await;
    assert!(!ctx.state().await["lastError"].is_null());

    ctx.ok(json!({"type": "login", "username": "a", "password": "a"}))
        .await;
    assert!(ctx.state().await["lastError"].is_null());
}

#[tokio::test]
async fn test_intent_on_wrong_screen() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx.intent(json!({"type": "checkout"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "not_available");
    assert_eq!(body["message"], "checkout is not available on the login screen");
    assert!(ctx.state().await["lastError"].is_null());
}

#[tokio::test]
async fn test_unknown_product_and_category() {
    let ctx = TestContext::start().await;
    ctx.login().await;

    let (status, body) = ctx
        .intent(json!({"type": "select_product", "id": "Karma"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_product");

    let (status, body) = ctx
        .intent(json!({"type": "set_category", "name": "Desktop Testing"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_category");
}

#[tokio::test]
async fn test_malformed_body() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx
        .intent(json!({"type": "add_to_cart", "id": "Jest", "quantity": 5}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_invalid_initial_screen_falls_back() {
    let ctx = TestContext::with_env(&[("STOREFRONT_INITIAL_SCREEN", "checkoutSuccess")]).await;
    // Splash delay is zero, so the fallback lands on login straight away.
    assert_eq!(ctx.state().await["screen"], "login");
}
