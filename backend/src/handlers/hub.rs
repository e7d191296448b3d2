//! Hub registry HTTP handlers

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppResult;
use crate::services::hub::HubService;
use crate::AppState;

/// All storage hubs with capacity and usage
pub async fn list_hubs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let hubs = HubService::new(state.db.clone()).list_hubs().await?;
    Ok(Json(json!({ "success": true, "data": hubs })))
}
