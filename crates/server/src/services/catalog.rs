//! Product domain service: title uniqueness, price updates, subscriptions.
//!
//! Price updates commit before subscribers are resolved, and subscribers
//! are resolved before any notification is dispatched, so a notification
//! never races the write it describes.

use pricewatch_core::{ProductId, UserId};

use crate::db::{ProductStore, RepositoryError, UserStore};
use crate::error::AppError;
use crate::models::{Product, ProductFilter};

use super::email::Mailer;
use super::notifier::PriceChangeNotifier;
use super::users::UserService;

/// Enforces product invariants and orchestrates price-change fan-out.
pub struct ProductService<P, U, M> {
    store: P,
    users: UserService<U>,
    notifier: PriceChangeNotifier<M>,
}

impl<P: Clone, U: Clone, M> Clone for ProductService<P, U, M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            users: self.users.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<P, U, M> ProductService<P, U, M>
where
    P: ProductStore,
    U: UserStore,
    M: Mailer,
{
    /// Create a new product service.
    pub const fn new(store: P, users: UserService<U>, notifier: PriceChangeNotifier<M>) -> Self {
        Self {
            store,
            users,
            notifier,
        }
    }

    /// Create a new product after confirming no existing product shares
    /// its title.
    ///
    /// The check-then-insert sequence is not guarded by a database unique
    /// constraint; concurrent duplicate creates can both pass the check.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AlreadyExists` if a product with this title exists.
    /// Returns `AppError::Storage` on repository failure.
    pub async fn create_product(&self, title: &str, price: f64) -> Result<ProductId, AppError> {
        let candidate = self
            .store
            .find_product(&ProductFilter::by_title(title))
            .await?;
        if let Some(existing) = candidate {
            tracing::warn!(product_id = %existing.id, title = %title, "product title taken");
            return Err(AppError::AlreadyExists("product"));
        }

        Ok(self.store.save_product(title, price).await?)
    }

    /// Update a product's price and notify its subscribers.
    ///
    /// The store applies a read-modify-write replacing only the price;
    /// id and title are preserved. On success, subscribers with a
    /// non-empty email each receive one notification; if none remain,
    /// no dispatch occurs.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist (no
    /// notification is dispatched in that case).
    /// Returns `AppError::Storage` or `AppError::Notification` on
    /// repository or dispatch failure.
    pub async fn update_price(&self, id: ProductId, price: f64) -> Result<(), AppError> {
        self.store
            .update_product(id, move |old| Product { price, ..old })
            .await
            .map_err(|err| match err {
                RepositoryError::NotFound => AppError::NotFound("product"),
                other => AppError::Storage(other),
            })?;

        let subscribers = self.users.subscribers_of(id).await?;
        let recipients: Vec<String> = subscribers
            .into_iter()
            .map(|user| user.email)
            .filter(|email| !email.is_empty())
            .collect();
        if recipients.is_empty() {
            return Ok(());
        }

        tracing::debug!(product_id = %id, count = recipients.len(), "dispatching price-change emails");
        self.notifier
            .notify_price_change(id, price, recipients)
            .await?;
        Ok(())
    }

    /// Subscribe a user to a product's price changes.
    ///
    /// Checks the user first, then the product, failing fast on the first
    /// missing entity.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound("user")` / `AppError::NotFound("product")`
    /// if either entity is missing.
    /// Returns `AppError::Storage` on repository failure.
    pub async fn subscribe(&self, user_id: UserId, product_id: ProductId) -> Result<(), AppError> {
        self.check_pair_exists(user_id, product_id).await?;
        Ok(self.store.subscribe(user_id, product_id).await?)
    }

    /// Remove a user's subscription to a product.
    ///
    /// Removing a subscription that does not exist succeeds (delete-if-
    /// exists semantics), but both entities must still exist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound("user")` / `AppError::NotFound("product")`
    /// if either entity is missing.
    /// Returns `AppError::Storage` on repository failure.
    pub async fn unsubscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), AppError> {
        self.check_pair_exists(user_id, product_id).await?;
        Ok(self.store.unsubscribe(user_id, product_id).await?)
    }

    async fn check_pair_exists(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("user"));
        }
        if self
            .store
            .find_product(&ProductFilter::by_id(product_id))
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("product"));
        }
        Ok(())
    }
}
