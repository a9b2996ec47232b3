//! Database operations for `PostgreSQL`.
//!
//! ## Tables
//!
//! - `products` - Product catalog (title, price)
//! - `users` - Registered users (phone, email)
//! - `user_sub_products` - Subscription join relation
//!
//! Every public repository operation runs inside its own transaction with a
//! bounded deadline: the body commits on success, and dropping the
//! transaction on the error path rolls it back. A commit failure surfaces
//! as [`RepositoryError::Database`] even when the body itself succeeded.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run at startup
//! via `sqlx::migrate!`.

pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use pricewatch_core::{ProductId, UserId};

use crate::models::{Product, ProductFilter, User, UserFilter};

pub use products::ProductRepository;
pub use users::UserRepository;

/// Default per-operation transaction deadline.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The operation's transaction deadline expired.
    #[error("database operation timed out")]
    Timeout,

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool is shared read/write across all domain services; each logical
/// operation holds one connection for the lifetime of its transaction.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Persistence contract for products and the subscription join relation.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert a new product row and return its generated ID.
    async fn save_product(&self, title: &str, price: f64) -> Result<ProductId, RepositoryError>;

    /// Return the first product matching the supplied filters, if any.
    ///
    /// Absence of a match is `Ok(None)`, not an error.
    async fn find_product(
        &self,
        filter: &ProductFilter,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Read the current product row, apply `update_fn` to produce the new
    /// state, and write it back, all within one transaction.
    ///
    /// Returns [`RepositoryError::NotFound`] if the row does not exist.
    async fn update_product<F>(&self, id: ProductId, update_fn: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(Product) -> Product + Send + 'static;

    /// Insert a subscription join row.
    async fn subscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError>;

    /// Delete the matching join row; no error if zero rows were affected.
    async fn unsubscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError>;
}

/// Persistence contract for users and subscriber resolution.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user row and return its generated ID.
    async fn create_user(&self, phone: &str, email: &str) -> Result<UserId, RepositoryError>;

    /// Return the first user matching the supplied filters, if any.
    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, RepositoryError>;

    /// Return all users subscribed to the given product.
    async fn subscribers_of(&self, product_id: ProductId) -> Result<Vec<User>, RepositoryError>;
}
