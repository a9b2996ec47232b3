//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use pricewatch_core::{ProductId, UserId};

use super::CreatedResponse;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub user_id: i32,
    pub product_id: i32,
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::InvalidArguments(
            "price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

/// `POST /products` - create a new product.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::InvalidArguments(
            "title must not be empty".to_string(),
        ));
    }
    validate_price(req.price)?;

    let id = state.catalog.create_product(&req.title, req.price).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.as_i32() }),
    ))
}

/// `PUT /products/{id}` - update a product's price.
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<StatusCode, AppError> {
    validate_price(req.price)?;

    state
        .catalog
        .update_price(ProductId::new(id), req.price)
        .await?;
    Ok(StatusCode::OK)
}

/// `POST /products/sub` - subscribe a user to a product.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<StatusCode, AppError> {
    state
        .catalog
        .subscribe(UserId::new(req.user_id), ProductId::new(req.product_id))
        .await?;
    Ok(StatusCode::OK)
}

/// `DELETE /products/unsub` - remove a user's subscription.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscriptionRequest>,
) -> Result<StatusCode, AppError> {
    state
        .catalog
        .unsubscribe(UserId::new(req.user_id), ProductId::new(req.product_id))
        .await?;
    Ok(StatusCode::OK)
}
