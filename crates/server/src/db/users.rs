//! User repository for database operations.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use pricewatch_core::{ProductId, UserId};

use super::{RepositoryError, UserStore};
use crate::models::{User, UserFilter};

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: i32,
    phone: String,
    email: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.user_id),
            phone: row.phone,
            email: row.email,
        }
    }
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    op_timeout: Duration,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Insert a new user row and return its generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert or commit fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn create_user(&self, phone: &str, email: &str) -> Result<UserId, RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let id = sqlx::query_scalar::<_, i32>(
                "INSERT INTO users (phone, email) VALUES ($1, $2) RETURNING user_id",
            )
            .bind(phone)
            .bind(email)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(UserId::new(id))
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }

    /// Return the first user matching the supplied filters, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let mut query = QueryBuilder::<Postgres>::new(
                "SELECT user_id, phone, email FROM users WHERE TRUE",
            );
            if let Some(id) = filter.id {
                query.push(" AND user_id = ").push_bind(id.as_i32());
            }
            if let Some(email) = &filter.email {
                query.push(" AND email = ").push_bind(email);
            }
            if let Some(phone) = &filter.phone {
                query.push(" AND phone = ").push_bind(phone);
            }

            let row = query
                .build_query_as::<UserRow>()
                .fetch_optional(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(row.map(User::from))
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }

    /// Return all users subscribed to the given product.
    ///
    /// The join is an inner join: users without a subscription row for this
    /// product are never returned, so a price change cannot broadcast to
    /// non-subscribers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::Timeout` if the deadline expires.
    async fn subscribers_of(&self, product_id: ProductId) -> Result<Vec<User>, RepositoryError> {
        tokio::time::timeout(self.op_timeout, async {
            let mut tx = self.pool.begin().await?;

            let rows = sqlx::query_as::<_, UserRow>(
                "SELECT u.user_id, u.phone, u.email \
                 FROM users u \
                 JOIN user_sub_products s ON s.user_id = u.user_id \
                 WHERE s.product_id = $1",
            )
            .bind(product_id)
            .fetch_all(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
        .map_err(|_| RepositoryError::Timeout)?
    }
}
