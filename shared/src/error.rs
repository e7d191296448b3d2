//! Domain rule violations
//!
//! Every business rule in this crate is checked before any mutation is
//! planned; violations surface as one of these variants. The backend maps
//! them onto HTTP statuses at its error boundary.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("{0} not found")]
    NotFound(String),

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
}

impl DomainError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
