//! Product repository for database operations.
//!
//! Also owns the subscription join relation, since subscribe/unsubscribe
//! are product-side operations in the domain layer.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use pricewatch_core::{ProductId, UserId};

use super::{ProductStore, RepositoryError};
use crate::models::{Product, ProductFilter};

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i32,
    title: String,
    price: f64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.product_id),
            title: row.title,
            price: row.price,
        }
    }
}

/// Repository for product database operations.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
    op_timeout: Duration,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    /// Insert a new product row and return its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert or commit fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn save_product(&self, title: &str, price: f64) -> Result<ProductId, RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let id = sqlx::query_scalar::<_, i32>(
                "INSERT INTO products (title, price) VALUES ($1, $2) RETURNING product_id",
            )
            .bind(title)
            .bind(price)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(ProductId::new(id))
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }

    /// Return the first product matching the supplied filters, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn find_product(
        &self,
        filter: &ProductFilter,
    ) -> Result<Option<Product>, RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let mut query = QueryBuilder::<Postgres>::new(
                "SELECT product_id, title, price FROM products WHERE TRUE",
            );
            if let Some(id) = filter.id {
                query.push(" AND product_id = ").push_bind(id.as_i32());
            }
            if let Some(title) = &filter.title {
                query.push(" AND title = ").push_bind(title);
            }

            let row = query
                .build_query_as::<ProductRow>()
                .fetch_optional(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(row.map(Product::from))
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }

    /// Read-modify-write price/title update within one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row does not exist.
    /// Returns `RepositoryError::Database` if the query or commit fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn update_product<F>(&self, id: ProductId, update_fn: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(Product) -> Product + Send + 'static,
    {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            // Dropping the transaction on the NotFound path rolls it back.
            let row = sqlx::query_as::<_, ProductRow>(
                "SELECT product_id, title, price FROM products WHERE product_id = $1",
            )
            .bind(id.as_i32())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

            let updated = update_fn(Product::from(row));

            let result = sqlx::query("UPDATE products SET title = $1, price = $2 WHERE product_id = $3")
                .bind(&updated.title)
                .bind(updated.price)
                .bind(id.as_i32())
                .execute(&mut *tx)
                .await?;
            tracing::debug!(product_id = %id, rows = result.rows_affected(), "updated product");

            tx.commit().await?;
            Ok(())
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }

    /// Insert a subscription join row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert or commit fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn subscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let result =
                sqlx::query("INSERT INTO user_sub_products (user_id, product_id) VALUES ($1, $2)")
                    .bind(user_id)
                    .bind(product_id)
                    .execute(&mut *tx)
                    .await?;
            tracing::debug!(
                user_id = %user_id,
                product_id = %product_id,
                rows = result.rows_affected(),
                "created subscription"
            );

            tx.commit().await?;
            Ok(())
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }

    /// Delete the matching join row; deleting zero rows is not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete or commit fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn unsubscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let result =
                sqlx::query("DELETE FROM user_sub_products WHERE user_id = $1 AND product_id = $2")
                    .bind(user_id)
                    .bind(product_id)
                    .execute(&mut *tx)
                    .await?;
            tracing::debug!(
                user_id = %user_id,
                product_id = %product_id,
                rows = result.rows_affected(),
                "deleted subscription"
            );

            tx.commit().await?;
            Ok(())
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }
}
