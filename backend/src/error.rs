//! Error handling for the FarmFresh platform
//!
//! Business-rule violations map to specific 4xx responses; unexpected
//! storage failures are logged in full server-side and surfaced as a
//! generic message. All error bodies use the standard
//! `{success: false, message}` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::DomainError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

    // Business rule errors
    #[error("Hub capacity exceeded for this booking")]
    CapacityExceeded,

    #[error("Lot {0} is not LISTED")]
    NotListed(String),

    #[error("Invalid quantity in cart")]
    InvalidQuantity,

    #[error("Not enough stock for {lot_id}. Available: {available} kg")]
    InsufficientStock { lot_id: String, available: String },

    #[error("Cart is empty")]
    EmptyCart,

    // Concurrency
    #[error("Conflicting update, please retry: {0}")]
    Conflict(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => AppError::Validation { field, message },
            DomainError::NotFound(resource) => AppError::NotFound(resource),
            DomainError::CapacityExceeded => AppError::CapacityExceeded,
            DomainError::NotListed(lot_id) => AppError::NotListed(lot_id),
            DomainError::InvalidQuantity => AppError::InvalidQuantity,
            DomainError::InsufficientStock { lot_id, available } => {
                AppError::InsufficientStock { lot_id, available }
            }
            DomainError::EmptyCart => AppError::EmptyCart,
        }
    }
}

/// Error response envelope
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation { message, .. } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::CapacityExceeded
            | AppError::NotListed(_)
            | AppError::InvalidQuantity
            | AppError::InsufficientStock { .. }
            | AppError::EmptyCart => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
