//! Storage alert HTTP handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppResult;
use crate::services::alert::AlertService;
use crate::AppState;

/// Lots currently outside the configured safe storage ranges
pub async fn get_alerts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = AlertService::new(state.db.clone(), state.config.safe_ranges.to_ranges());
    let alerts = service.current_alerts().await?;
    Ok(Json(json!({ "success": true, "data": alerts })))
}
