//! Route definitions for the FarmFresh platform

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Hub registry
        .route("/hubs", get(handlers::list_hubs))
        // Lot lifecycle (booking + operator)
        .nest("/lots", lot_routes())
        // Public marketplace
        .nest("/market", market_routes())
        // Orders and stock reservation
        .nest("/orders", order_routes())
        // Ledger views
        .route("/payments/ledger/:lot_id", get(handlers::get_lot_ledger))
        // Storage alerts
        .route("/alerts", get(handlers::get_alerts))
        // Notification event log
        .route("/notifications", get(handlers::list_notifications))
}

/// Lot booking and operator routes
fn lot_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_lots).post(handlers::create_lot))
        .route("/farmer", get(handlers::farmer_lots))
        .route("/by-lotid/:lot_id", get(handlers::get_lot_by_code))
        .route("/:id", get(handlers::get_lot).patch(handlers::update_lot))
}

/// Public marketplace routes
fn market_routes() -> Router<AppState> {
    Router::new()
        .route("/lots", get(handlers::market_lots))
        .route("/trace/:lot_id", get(handlers::get_trace))
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::place_order))
        .route("/:id", get(handlers::get_order))
        .route("/:id/status", patch(handlers::update_order_status))
        .route("/:id/pay", post(handlers::initiate_payment))
}
