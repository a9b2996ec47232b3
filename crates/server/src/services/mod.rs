//! Business logic services.
//!
//! # Services
//!
//! - `catalog` - Product invariants, price updates, subscriptions
//! - `users` - User invariants, subscriber resolution
//! - `notifier` - Concurrent price-change notification fan-out
//! - `email` - Email delivery via SMTP

pub mod catalog;
pub mod email;
pub mod notifier;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::ProductService;
pub use email::{EmailError, Mailer, SmtpMailer};
pub use notifier::{NotifyError, PriceChangeNotifier};
pub use users::UserService;
