//! Public marketplace HTTP handlers

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shared::ids::LotRef;

use crate::error::{AppError, AppResult};
use crate::services::market::{MarketFilter, MarketService};
use crate::AppState;

/// Public listing of LISTED lots
pub async fn market_lots(
    State(state): State<AppState>,
    Query(filter): Query<MarketFilter>,
) -> AppResult<impl IntoResponse> {
    let lots = MarketService::new(state.db.clone()).market_lots(filter).await?;
    Ok(Json(json!({ "success": true, "data": lots })))
}

/// Provenance timeline for one lot
pub async fn get_trace(
    State(state): State<AppState>,
    Path(lot_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let lot_ref = LotRef::parse(&lot_id).ok_or_else(|| AppError::Validation {
        field: "lotId".to_string(),
        message: "Invalid lot id".to_string(),
    })?;

    let trace = MarketService::new(state.db.clone()).trace(&lot_ref).await?;
    Ok(Json(json!({ "success": true, "data": trace })))
}
