//! HTTP routes. Thin delivery layer: handlers bind and validate request
//! bodies, delegate to the domain services, and translate results.

pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Response body for create endpoints.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i32,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", post(users::register))
        .route("/products", post(products::create))
        .route("/products/{id}", put(products::update_price))
        .route("/products/sub", post(products::subscribe))
        .route("/products/unsub", delete(products::unsubscribe))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
