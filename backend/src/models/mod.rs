//! Database models for the FarmFresh platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
