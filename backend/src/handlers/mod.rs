//! HTTP handlers for the FarmFresh platform

pub mod alert;
pub mod health;
pub mod hub;
pub mod lot;
pub mod market;
pub mod notification;
pub mod order;
pub mod payment;

pub use alert::*;
pub use health::*;
pub use hub::*;
pub use lot::*;
pub use market::*;
pub use notification::*;
pub use order::*;
pub use payment::*;
