//! Notification HTTP handlers

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::services::notification::NotificationService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub limit: Option<i64>,
}

/// Recent notification events, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let notifications = NotificationService::new(state.db.clone())
        .list(query.limit.unwrap_or(50))
        .await?;
    Ok(Json(json!({ "success": true, "data": notifications })))
}
