//! Pricewatch server library.
//!
//! Users subscribe to products and receive an email whenever a product's
//! price changes. The domain layer enforces uniqueness and existence
//! invariants over a transactional `PostgreSQL` store; price updates fan
//! out one concurrent notification per subscriber.
//!
//! # Architecture
//!
//! - Axum web framework (thin delivery layer)
//! - sqlx repositories, one bounded-deadline transaction per operation
//! - lettre SMTP transport for notifications
//!
//! The crate is a library so the domain services can be tested and reused;
//! the binary in `main.rs` is only the composition point.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
