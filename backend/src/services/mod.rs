//! Business logic services for the FarmFresh platform

pub mod alert;
pub mod bootstrap;
pub mod hub;
pub mod ledger;
pub mod lot;
pub mod market;
pub mod notification;
pub mod order;

pub use alert::AlertService;
pub use hub::HubService;
pub use ledger::LedgerService;
pub use lot::LotService;
pub use market::MarketService;
pub use notification::NotificationService;
pub use order::OrderService;
