//! Shared domain core for the FarmFresh cold-storage and marketplace platform
//!
//! This crate contains the models and pure business rules shared between the
//! backend server and any future tooling: the lot lifecycle state machine,
//! settlement arithmetic, order planning, alert evaluation and booking
//! validation. Nothing in here performs I/O.

pub mod alerts;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod models;
pub mod orders;
pub mod settlement;
pub mod validation;

pub use error::DomainError;
pub use models::*;
