use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AddWishlistItemRequest {
    pub product_id: u64,
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub items: Vec<u64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/wishlist", get(list_items).post(add_item))
        .route("/v1/wishlist/{product_id}", delete(remove_item))
}

async fn list_items(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<WishlistResponse>, AppError> {
    let items = state
        .wishlist
        .list(&claims.sub)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    Ok(Json(WishlistResponse { items }))
}

async fn add_item(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<AddWishlistItemRequest>,
) -> Result<StatusCode, AppError> {
    let added = state
        .wishlist
        .add(&claims.sub, req.product_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    // Re-adding an existing product is a no-op, not an error.
    if added {
        Ok(StatusCode::CREATED)
    } else {
        Ok(StatusCode::OK)
    }
}

async fn remove_item(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(product_id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .wishlist
        .remove(&claims.sub, product_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(
            "Product not in wishlist".to_string(),
        ))
    }
}
