use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aurelia_core::payment::PaymentStatus;
use aurelia_order::models::{CartItem, Order, OrderStatus, OrderSummary, ShippingDetails};
use aurelia_order::LedgerError;
use aurelia_shared::models::events::OrderStatusChangedEvent;

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub items: Vec<CartItem>,
    pub shipping: ShippingDetails,
    pub summary: OrderSummary,
    pub tracking_number: String,
    pub created_at: chrono::DateTime<Utc>,
    pub estimated_delivery: NaiveDate,
    pub payment_status: PaymentStatus,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_number: order.order_number,
            status: order.status,
            items: order.items,
            shipping: order.shipping,
            summary: order.summary,
            tracking_number: order.tracking_number,
            created_at: order.created_at,
            estimated_delivery: order.estimated_delivery,
            payment_status: order.payment_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrackingResponse {
    pub status: OrderStatus,
    pub message: String,
    pub estimated_delivery: NaiveDate,
    pub tracking_number: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(list_orders))
        .route("/v1/orders/{id}", get(get_order))
        .route("/v1/orders/{id}/tracking", get(get_tracking))
        .route("/v1/orders/{id}/status", post(update_status))
        .route("/v1/orders/{id}/cancel", post(cancel_order))
}

/// GET /v1/orders
/// The signed-in customer's orders, oldest first
async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state
        .ledger
        .list_orders(&claims.sub)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /v1/orders/:id
async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = owned_order(&state, &claims, order_id).await?;
    Ok(Json(order.into()))
}

/// GET /v1/orders/:id/tracking
async fn get_tracking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<TrackingResponse>, AppError> {
    // Ownership check first; tracking itself carries no customer id.
    owned_order(&state, &claims, order_id).await?;

    let tracking = state
        .ledger
        .tracking(order_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Order not found".to_string()))?;

    Ok(Json(TrackingResponse {
        status: tracking.status,
        message: tracking.message,
        estimated_delivery: tracking.estimated_delivery,
        tracking_number: tracking.tracking_number,
    }))
}

/// POST /v1/orders/:id/status
async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = owned_order(&state, &claims, order_id).await?;

    let updated = state
        .ledger
        .update_status(order_id, req.status)
        .await
        .map_err(map_ledger_error)?;

    state.telemetry.log_status_changed(OrderStatusChangedEvent {
        order_id,
        from_status: format!("{:?}", order.status),
        to_status: format!("{:?}", updated.status),
        timestamp: Utc::now().timestamp(),
    });

    Ok(Json(updated.into()))
}

/// POST /v1/orders/:id/cancel
/// Idempotent for already-cancelled orders
async fn cancel_order(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let order = owned_order(&state, &claims, order_id).await?;

    if order.status == OrderStatus::Cancelled {
        return Ok(StatusCode::NO_CONTENT);
    }

    state
        .ledger
        .update_status(order_id, OrderStatus::Cancelled)
        .await
        .map_err(map_ledger_error)?;

    state.telemetry.log_status_changed(OrderStatusChangedEvent {
        order_id,
        from_status: format!("{:?}", order.status),
        to_status: format!("{:?}", OrderStatus::Cancelled),
        timestamp: Utc::now().timestamp(),
    });

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch an order and verify it belongs to the caller. Foreign orders read
/// as not-found so ids can't be probed.
async fn owned_order(
    state: &AppState,
    claims: &CustomerClaims,
    order_id: Uuid,
) -> Result<Order, AppError> {
    let order = state
        .ledger
        .get_order(order_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Order not found".to_string()))?;

    if order.customer_id != claims.sub {
        return Err(AppError::NotFoundError("Order not found".to_string()));
    }
    Ok(order)
}

fn map_ledger_error(err: LedgerError) -> AppError {
    match err {
        LedgerError::NotFound(_) => AppError::NotFoundError("Order not found".to_string()),
        LedgerError::TerminalStatus { .. } => AppError::ConflictError(err.to_string()),
        LedgerError::Storage(_) => AppError::InternalServerError(err.to_string()),
    }
}
