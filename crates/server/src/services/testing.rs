//! In-memory fakes for domain-service tests.
//!
//! `FakeStore` implements both store traits over one shared state so the
//! join relation observed by subscriber resolution is the same one the
//! product side writes to. `FakeMailer` records every delivery attempt
//! and can be told to fail for a single recipient.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pricewatch_core::{ProductId, UserId};

use crate::db::{ProductStore, RepositoryError, UserStore};
use crate::models::{Product, ProductFilter, User, UserFilter};
use crate::services::email::{EmailError, Mailer};

#[derive(Default)]
struct StoreInner {
    products: Vec<Product>,
    users: Vec<User>,
    subscriptions: Vec<(UserId, ProductId)>,
    next_product_id: i32,
    next_user_id: i32,
    find_user_calls: usize,
    fail_next_update: bool,
}

/// Shared in-memory entity store.
#[derive(Clone, Default)]
pub(crate) struct FakeStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl FakeStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("store lock poisoned")
    }

    pub(crate) fn product(&self, id: ProductId) -> Option<Product> {
        self.lock().products.iter().find(|p| p.id == id).cloned()
    }

    pub(crate) fn product_count(&self) -> usize {
        self.lock().products.len()
    }

    pub(crate) fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub(crate) fn find_user_calls(&self) -> usize {
        self.lock().find_user_calls
    }

    pub(crate) fn subscriptions(&self) -> Vec<(UserId, ProductId)> {
        self.lock().subscriptions.clone()
    }

    /// Make the next `update_product` call fail with a storage error.
    pub(crate) fn fail_next_update(&self) {
        self.lock().fail_next_update = true;
    }
}

#[async_trait]
impl ProductStore for FakeStore {
    async fn save_product(&self, title: &str, price: f64) -> Result<ProductId, RepositoryError> {
        let mut inner = self.lock();
        inner.next_product_id += 1;
        let id = ProductId::new(inner.next_product_id);
        inner.products.push(Product {
            id,
            title: title.to_owned(),
            price,
        });
        Ok(id)
    }

    async fn find_product(
        &self,
        filter: &ProductFilter,
    ) -> Result<Option<Product>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .products
            .iter()
            .find(|p| {
                filter.id.is_none_or(|id| p.id == id)
                    && filter.title.as_ref().is_none_or(|t| &p.title == t)
            })
            .cloned())
    }

    async fn update_product<F>(&self, id: ProductId, update_fn: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(Product) -> Product + Send + 'static,
    {
        let mut inner = self.lock();
        if inner.fail_next_update {
            inner.fail_next_update = false;
            return Err(RepositoryError::Timeout);
        }
        let Some(pos) = inner.products.iter().position(|p| p.id == id) else {
            return Err(RepositoryError::NotFound);
        };
        let old = inner.products[pos].clone();
        inner.products[pos] = update_fn(old);
        Ok(())
    }

    async fn subscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        self.lock().subscriptions.push((user_id, product_id));
        Ok(())
    }

    async fn unsubscribe(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        self.lock()
            .subscriptions
            .retain(|pair| *pair != (user_id, product_id));
        Ok(())
    }
}

#[async_trait]
impl UserStore for FakeStore {
    async fn create_user(&self, phone: &str, email: &str) -> Result<UserId, RepositoryError> {
        let mut inner = self.lock();
        inner.next_user_id += 1;
        let id = UserId::new(inner.next_user_id);
        inner.users.push(User {
            id,
            phone: phone.to_owned(),
            email: email.to_owned(),
        });
        Ok(id)
    }

    async fn find_user(&self, filter: &UserFilter) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.lock();
        inner.find_user_calls += 1;
        Ok(inner
            .users
            .iter()
            .find(|u| {
                filter.id.is_none_or(|id| u.id == id)
                    && filter.email.as_ref().is_none_or(|e| &u.email == e)
                    && filter.phone.as_ref().is_none_or(|p| &u.phone == p)
            })
            .cloned())
    }

    async fn subscribers_of(&self, product_id: ProductId) -> Result<Vec<User>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .users
            .iter()
            .filter(|u| {
                inner
                    .subscriptions
                    .iter()
                    .any(|(uid, pid)| *uid == u.id && *pid == product_id)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct MailerInner {
    attempts: Vec<(String, String, String)>,
    fail_for: Option<String>,
}

/// Mail transport fake recording `(to, subject, body)` per attempt.
#[derive(Clone, Default)]
pub(crate) struct FakeMailer {
    inner: Arc<Mutex<MailerInner>>,
}

impl FakeMailer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attempts(&self) -> Vec<(String, String, String)> {
        self.inner.lock().expect("mailer lock poisoned").attempts.clone()
    }

    /// Configure delivery to the given recipient to fail.
    pub(crate) fn fail_for(&self, recipient: &str) {
        self.inner.lock().expect("mailer lock poisoned").fail_for = Some(recipient.to_owned());
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let mut inner = self.inner.lock().expect("mailer lock poisoned");
        inner
            .attempts
            .push((to.to_owned(), subject.to_owned(), body.to_owned()));
        if inner.fail_for.as_deref() == Some(to) {
            return Err(EmailError::InvalidAddress(to.to_owned()));
        }
        Ok(())
    }
}
