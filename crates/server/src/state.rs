//! Shared application state for the HTTP layer.
//!
//! All dependencies are injected at the composition point in `main.rs`;
//! there is no ambient global state.

use crate::db::{ProductRepository, UserRepository};
use crate::services::{ProductService, SmtpMailer, UserService};

/// Concrete product service type used in production.
pub type Catalog = ProductService<ProductRepository, UserRepository, SmtpMailer>;

/// Concrete user service type used in production.
pub type Users = UserService<UserRepository>;

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub users: Users,
}
