//! Domain types for products, users, and lookup filters.

pub mod product;
pub mod user;

pub use product::{Product, ProductFilter};
pub use user::{User, UserFilter};
