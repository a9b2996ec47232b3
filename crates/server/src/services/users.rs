//! User domain service: registration invariants and subscriber resolution.

use pricewatch_core::{ProductId, UserId};

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{User, UserFilter};

/// Enforces user invariants over a [`UserStore`].
#[derive(Clone)]
pub struct UserService<S> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    /// Create a new user service.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a new user.
    ///
    /// At least one of phone/email must be non-empty; the supplied fields
    /// must not match an existing user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidArguments` if both fields are empty (no
    /// store access is made in that case).
    /// Returns `AppError::AlreadyExists` if a candidate matches.
    /// Returns `AppError::Storage` on repository failure.
    pub async fn register(&self, phone: &str, email: &str) -> Result<UserId, AppError> {
        if phone.is_empty() && email.is_empty() {
            return Err(AppError::InvalidArguments(
                "phone and email must not both be empty".to_string(),
            ));
        }

        let candidate = self
            .store
            .find_user(&UserFilter::matching(phone, email))
            .await?;
        if let Some(existing) = candidate {
            tracing::warn!(user_id = %existing.id, "registration matched an existing user");
            return Err(AppError::AlreadyExists("user"));
        }

        Ok(self.store.create_user(phone, email).await?)
    }

    /// Look up a user by ID.
    ///
    /// Absence is `Ok(None)`, not an error; callers own existence checks.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` on repository failure.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.store.find_user(&UserFilter::by_id(id)).await?)
    }

    /// Resolve all users subscribed to the given product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` on repository failure.
    pub async fn subscribers_of(&self, product_id: ProductId) -> Result<Vec<User>, AppError> {
        Ok(self.store.subscribers_of(product_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeStore;

    #[tokio::test]
    async fn test_register_returns_generated_id() {
        let store = FakeStore::new();
        let users = UserService::new(store);

        let id = users
            .register("", "a@b.com")
            .await
            .expect("registration should succeed");
        assert_eq!(id, UserId::new(1));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_phone_and_email() {
        let store = FakeStore::new();
        let users = UserService::new(store.clone());

        let err = users.register("", "").await.expect_err("must be rejected");
        assert!(matches!(err, AppError::InvalidArguments(_)));

        // No store access at all for an invalid registration.
        assert_eq!(store.user_count(), 0);
        assert_eq!(store.find_user_calls(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails() {
        let store = FakeStore::new();
        let users = UserService::new(store.clone());

        users.register("", "a@b.com").await.expect("first register");
        let err = users
            .register("", "a@b.com")
            .await
            .expect_err("duplicate email must fail");
        assert!(matches!(err, AppError::AlreadyExists("user")));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_register_duplicate_phone_fails() {
        let store = FakeStore::new();
        let users = UserService::new(store);

        users.register("12345", "").await.expect("first register");
        let err = users
            .register("12345", "")
            .await
            .expect_err("duplicate phone must fail");
        assert!(matches!(err, AppError::AlreadyExists("user")));
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_none() {
        let store = FakeStore::new();
        let users = UserService::new(store);

        let found = users
            .find_by_id(UserId::new(99))
            .await
            .expect("lookup should not error");
        assert!(found.is_none());
    }
}
