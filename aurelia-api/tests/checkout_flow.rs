use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use aurelia_api::auth::LoginThrottle;
use aurelia_api::middleware::rate_limit::RateLimiter;
use aurelia_api::notify::ConsoleMailer;
use aurelia_api::state::{AppState, AuthConfig};
use aurelia_api::app;
use aurelia_order::{CheckoutService, OrderLedger, SimulatedGateway};
use aurelia_rates::{ShippingCalculator, TaxCalculator};
use aurelia_store::{
    MemoryOrderRepository, MemoryUserRepository, MemoryWishlistRepository, Telemetry,
};

fn test_app(success_rate: f64) -> Router {
    let order_repo = Arc::new(MemoryOrderRepository::new());
    let ledger = Arc::new(OrderLedger::new(order_repo, "AU"));
    let gateway = Arc::new(SimulatedGateway::new(success_rate, Duration::from_millis(0)));
    let checkout = Arc::new(CheckoutService::new(
        ShippingCalculator::default(),
        TaxCalculator::default(),
        gateway,
        ledger.clone(),
        Duration::from_secs(1),
    ));

    app(AppState {
        users: Arc::new(MemoryUserRepository::with_demo_user()),
        wishlist: Arc::new(MemoryWishlistRepository::new()),
        checkout,
        ledger,
        telemetry: Arc::new(Telemetry::new()),
        mailer: Arc::new(ConsoleMailer::new("http://localhost:3000")),
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        },
        rate_limiter: Arc::new(RateLimiter::new(10_000, Duration::from_secs(60))),
        login_throttle: Arc::new(LoginThrottle::new(5, Duration::from_secs(900))),
    })
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "john@example.com", "password": "demo123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn checkout_body() -> Value {
    json!({
        "items": [
            { "id": 1, "name": "Sapphire Pendant", "price_cents": 10000, "quantity": 1 }
        ],
        "shipping_address": {
            "street": "123 Main St",
            "city": "Los Angeles",
            "state": "CA",
            "zip_code": "90001",
            "country": "US"
        },
        "shipping_method": "twoDay",
        "card": { "number": "4111111111111111", "exp_month": 12, "exp_year": 99, "cvc": "123" },
        "billing_name": "John Doe",
        "billing_email": "john@example.com"
    })
}

#[tokio::test]
async fn login_returns_a_token_for_the_demo_user() {
    let app = test_app(1.0);
    let token = login(&app).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = test_app(1.0);
    let (status, body) = request(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "john@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn checkout_requires_authentication() {
    let app = test_app(1.0);
    let (status, _) = request(&app, "POST", "/v1/checkout", None, Some(checkout_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_checkout_order_and_tracking_flow() {
    let app = test_app(1.0);
    let token = login(&app).await;

    // Place the order: $100 subtotal, CA/90001 two-day → $35 shipping,
    // 10% combined tax → $145 total.
    let (status, placed) = request(
        &app,
        "POST",
        "/v1/checkout",
        Some(&token),
        Some(checkout_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(placed["total_cents"], 14500);

    let order_number = placed["order_number"].as_str().unwrap();
    let parts: Vec<&str> = order_number.split('-').collect();
    assert_eq!(parts[0], "AU");
    assert_eq!(parts[1].len(), 8);
    assert_eq!(parts[2].len(), 4);

    let order_id = placed["order_id"].as_str().unwrap().to_string();
    let tracking_number = placed["tracking_number"].as_str().unwrap().to_string();
    assert!(tracking_number.starts_with("1Z999AA"));

    // Fetch the order back.
    let (status, order) = request(
        &app,
        "GET",
        &format!("/v1/orders/{}", order_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["payment_status"], "COMPLETED");
    assert_eq!(order["summary"]["subtotal_cents"], 10000);
    assert_eq!(order["summary"]["shipping_cents"], 3500);
    assert_eq!(order["summary"]["tax_cents"], 1000);
    assert_eq!(order["summary"]["total_cents"], 14500);

    // Tracking round-trips the tracking number and pending message.
    let (status, tracking) = request(
        &app,
        "GET",
        &format!("/v1/orders/{}/tracking", order_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracking["tracking_number"], tracking_number.as_str());
    assert_eq!(tracking["message"], "Order received, payment pending");

    // Walk the status forward, then cancel attempts must conflict once
    // the order is delivered.
    let (status, updated) = request(
        &app,
        "POST",
        &format!("/v1/orders/{}/status", order_id),
        Some(&token),
        Some(json!({ "status": "DELIVERED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "DELIVERED");

    let (status, _) = request(
        &app,
        "POST",
        &format!("/v1/orders/{}/status", order_id),
        Some(&token),
        Some(json!({ "status": "PENDING" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancelling_a_pending_order_succeeds_and_is_idempotent() {
    let app = test_app(1.0);
    let token = login(&app).await;

    let (_, placed) = request(
        &app,
        "POST",
        "/v1/checkout",
        Some(&token),
        Some(checkout_body()),
    )
    .await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let (status, _) = request(
        &app,
        "POST",
        &format!("/v1/orders/{}/cancel", order_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Second cancel is a no-op.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/v1/orders/{}/cancel", order_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, order) = request(
        &app,
        "GET",
        &format!("/v1/orders/{}", order_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(order["status"], "CANCELLED");
}

#[tokio::test]
async fn declined_payment_maps_to_payment_required() {
    let app = test_app(0.0);
    let token = login(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/checkout",
        Some(&token),
        Some(checkout_body()),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"], "Payment declined: Payment declined");

    // Nothing was recorded.
    let (_, orders) = request(&app, "GET", "/v1/orders", Some(&token), None).await;
    assert_eq!(orders.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn invalid_card_is_rejected_before_payment() {
    let app = test_app(1.0);
    let token = login(&app).await;

    let mut body = checkout_body();
    body["card"]["number"] = json!("123");
    let (status, response) =
        request(&app, "POST", "/v1/checkout", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Invalid card number");
}

#[tokio::test]
async fn quotes_endpoint_prices_without_committing() {
    let app = test_app(1.0);
    let token = login(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/v1/checkout/quotes",
        Some(&token),
        Some(json!({
            "items": [
                { "id": 1, "name": "Gold Band", "price_cents": 4000, "quantity": 5 }
            ],
            "shipping_address": {
                "street": "1 Pine St",
                "city": "Seattle",
                "state": "WA",
                "zip_code": "98101",
                "country": "US"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subtotal_cents"], 20000);
    // $200 ≥ $150 threshold → ground free; 5 items → 1.1 weight factor on
    // the premium methods (zone 1: 25 → 28, 45 → 50).
    assert_eq!(body["quotes"][0]["rate_cents"], 0);
    assert_eq!(body["quotes"][1]["rate_cents"], 2800);
    assert_eq!(body["quotes"][2]["rate_cents"], 5000);
    // WA 6.5% + Seattle 3.6% local on $200.
    assert_eq!(body["tax_cents"], 2020);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let app = test_app(1.0);
    let token = login(&app).await;

    let (status, _) = request(
        &app,
        "GET",
        "/v1/orders/00000000-0000-0000-0000-000000000000",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wishlist_add_list_remove_flow() {
    let app = test_app(1.0);
    let token = login(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/v1/wishlist",
        Some(&token),
        Some(json!({ "product_id": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Re-adding is a no-op.
    let (status, _) = request(
        &app,
        "POST",
        "/v1/wishlist",
        Some(&token),
        Some(json!({ "product_id": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = request(&app, "GET", "/v1/wishlist", Some(&token), None).await;
    assert_eq!(body["items"], json!([7]));

    let (status, _) = request(&app, "DELETE", "/v1/wishlist/7", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&app, "DELETE", "/v1/wishlist/7", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forgot_password_never_reveals_whether_an_account_exists() {
    let app = test_app(1.0);

    for email in ["john@example.com", "nobody@example.com"] {
        let (status, body) = request(
            &app,
            "POST",
            "/v1/auth/forgot-password",
            None,
            Some(json!({ "email": email })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }
}

#[tokio::test]
async fn registration_requires_verification_before_login() {
    let app = test_app(1.0);

    let (status, body) = request(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": "new@example.com", "password": "pw12345", "name": "New User" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_verified"], false);

    let (status, body) = request(
        &app,
        "POST",
        "/v1/auth/login",
        None,
        Some(json!({ "email": "new@example.com", "password": "pw12345" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please verify your email address");

    // Duplicate registration conflicts.
    let (status, _) = request(
        &app,
        "POST",
        "/v1/auth/register",
        None,
        Some(json!({ "email": "new@example.com", "password": "pw12345", "name": "New User" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
