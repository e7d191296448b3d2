//! Ledger HTTP handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shared::ids::LotRef;

use crate::error::{AppError, AppResult};
use crate::services::ledger::LedgerService;
use crate::AppState;

/// Ledger view for one lot: advance, deductions, final settlement
pub async fn get_lot_ledger(
    State(state): State<AppState>,
    Path(lot_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let lot_ref = LotRef::parse(&lot_id).ok_or_else(|| AppError::Validation {
        field: "lotId".to_string(),
        message: "Invalid lot id".to_string(),
    })?;

    let ledger = LedgerService::new(state.db.clone()).lot_ledger(&lot_ref).await?;
    Ok(Json(json!({ "success": true, "data": ledger })))
}
