//! Unified error handling for the service.
//!
//! Domain services never swallow store errors: they either pass them
//! through unchanged or wrap them with a named sentinel (`AlreadyExists`,
//! `NotFound`, `InvalidArguments`) so the HTTP layer can map them to
//! distinguishable responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::notifier::NotifyError;

/// Application-level error type for the domain services and HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// An entity with the same identity already exists.
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// Referenced entity was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request arguments failed domain validation.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Database operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Notification fan-out failed for at least one recipient.
    #[error("notification error: {0}")]
    Notification(#[from] NotifyError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Storage(_) | Self::Notification(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidArguments(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Storage(_) | Self::Notification(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}
