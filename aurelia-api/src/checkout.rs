use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aurelia_core::payment::{BillingDetails, CardDetails};
use aurelia_order::models::CartItem;
use aurelia_order::{CheckoutError, CheckoutRequest};
use aurelia_rates::zones::ShippingMethod;
use aurelia_shared::models::events::{OrderPlacedEvent, PaymentCapturedEvent};
use aurelia_shared::{Address, Masked};

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub items: Vec<CartItem>,
    pub shipping_address: Address,
    pub shipping_method: ShippingMethod,
    pub card: CardBody,
    pub billing_name: String,
    pub billing_email: String,
}

#[derive(Debug, Deserialize)]
pub struct CardBody {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub tracking_number: String,
    pub total_cents: i64,
    pub estimated_delivery: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBody {
    pub items: Vec<CartItem>,
    pub shipping_address: Address,
}

#[derive(Debug, Serialize)]
pub struct QuoteOption {
    pub method: ShippingMethod,
    pub label: &'static str,
    pub rate_cents: i64,
    pub estimated_days: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub subtotal_cents: i64,
    pub quotes: Vec<QuoteOption>,
    pub tax_rate: f64,
    pub tax_cents: i64,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/checkout", post(place_order))
        .route("/v1/checkout/quotes", post(quote))
}

/// POST /v1/checkout
/// Run the full pricing + payment + order pipeline for the signed-in customer
async fn place_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(body): Json<CheckoutBody>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let billing_email = body.billing_email.clone();
    let request = CheckoutRequest {
        customer_id: claims.sub.clone(),
        items: body.items,
        address: body.shipping_address.clone(),
        method: body.shipping_method,
        card: CardDetails {
            number: body.card.number,
            exp_month: body.card.exp_month,
            exp_year: body.card.exp_year,
            cvc: body.card.cvc,
        },
        billing: BillingDetails {
            name: body.billing_name,
            email: Masked(body.billing_email),
            address: body.shipping_address,
        },
    };

    let receipt = state
        .checkout
        .checkout(request)
        .await
        .map_err(map_checkout_error)?;
    let order = &receipt.order;

    state.telemetry.log_order_placed(OrderPlacedEvent {
        order_id: order.id,
        order_number: order.order_number.clone(),
        customer_id: order.customer_id.clone(),
        total_cents: order.summary.total_cents,
        timestamp: Utc::now().timestamp(),
    });
    state.telemetry.log_payment_captured(PaymentCapturedEvent {
        order_id: order.id,
        transaction_id: receipt.transaction_id.clone(),
        amount_cents: order.summary.total_cents,
        currency: "usd".to_string(),
        timestamp: Utc::now().timestamp(),
    });

    if let Err(e) = state
        .mailer
        .send_order_confirmation(&billing_email, &order.order_number, order.summary.total_cents)
        .await
    {
        tracing::warn!(order_number = %order.order_number, error = %e, "confirmation email failed");
    }

    Ok(Json(CheckoutResponse {
        order_id: order.id,
        order_number: order.order_number.clone(),
        tracking_number: order.tracking_number.clone(),
        total_cents: order.summary.total_cents,
        estimated_delivery: order.estimated_delivery,
    }))
}

/// POST /v1/checkout/quotes
/// Price a cart against a destination without committing to anything
async fn quote(
    State(state): State<AppState>,
    Json(body): Json<QuoteBody>,
) -> Result<Json<QuoteResponse>, AppError> {
    let subtotal_cents: i64 = body.items.iter().map(CartItem::line_total_cents).sum();
    let total_items: u32 = body.items.iter().map(|i| i.quantity).sum();

    let quotes = state
        .checkout
        .shipping_calculator()
        .quotes(&body.shipping_address, total_items, subtotal_cents)
        .into_iter()
        .map(|q| QuoteOption {
            method: q.method,
            label: q.method.display_name(),
            rate_cents: q.rate_cents,
            estimated_days: q.estimated_days,
        })
        .collect();

    let tax = state
        .checkout
        .tax_calculator()
        .calculate(&body.shipping_address, subtotal_cents);

    Ok(Json(QuoteResponse {
        subtotal_cents,
        quotes,
        tax_rate: tax.rate,
        tax_cents: tax.amount_cents,
    }))
}

fn map_checkout_error(err: CheckoutError) -> AppError {
    match err {
        CheckoutError::EmptyCart
        | CheckoutError::InvalidItem(_)
        | CheckoutError::MissingAddressField(_)
        | CheckoutError::Card(_)
        | CheckoutError::InvalidAmount => AppError::ValidationError(err.to_string()),
        CheckoutError::Declined(_) => AppError::PaymentRequiredError(err.to_string()),
        CheckoutError::Gateway(_)
        | CheckoutError::OrderNotRecorded
        | CheckoutError::Ledger(_) => AppError::InternalServerError(err.to_string()),
    }
}
