//! Lot booking and operator HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shared::ids::LotRef;
use shared::lifecycle::UpdateLotInput;
use shared::validation::CreateLotInput;

use crate::error::{AppError, AppResult};
use crate::services::lot::{FarmerLotFilter, LotFilter, LotService};
use crate::AppState;

fn lot_service(state: &AppState) -> LotService {
    LotService::new(state.db.clone(), state.config.fees.to_fees())
}

fn parse_lot_ref(raw: &str) -> AppResult<LotRef> {
    LotRef::parse(raw).ok_or_else(|| AppError::Validation {
        field: "id".to_string(),
        message: "Invalid lot id".to_string(),
    })
}

/// Create a booking
pub async fn create_lot(
    State(state): State<AppState>,
    Json(input): Json<CreateLotInput>,
) -> AppResult<impl IntoResponse> {
    let (lot, advance) = lot_service(&state).create_lot(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": lot,
            "meta": {
                "advanceAmount": advance,
                "safeRanges": state.config.safe_ranges.to_ranges(),
            },
        })),
    ))
}

/// Operator dashboard list with filters
pub async fn list_lots(
    State(state): State<AppState>,
    Query(filter): Query<LotFilter>,
) -> AppResult<impl IntoResponse> {
    let lots = lot_service(&state).list_lots(filter).await?;
    Ok(Json(json!({ "success": true, "data": lots })))
}

/// A farmer's own lots, by phone
pub async fn farmer_lots(
    State(state): State<AppState>,
    Query(filter): Query<FarmerLotFilter>,
) -> AppResult<impl IntoResponse> {
    let lots = lot_service(&state).farmer_lots(filter).await?;
    Ok(Json(json!({ "success": true, "data": lots })))
}

/// Lot detail by internal id or LOT- code
pub async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let lot_ref = parse_lot_ref(&id)?;
    let lot = lot_service(&state).get_lot(&lot_ref).await?;
    Ok(Json(json!({ "success": true, "data": lot })))
}

/// Lot lookup by human-readable code
pub async fn get_lot_by_code(
    State(state): State<AppState>,
    Path(lot_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let lot = lot_service(&state)
        .get_lot(&LotRef::Code(lot_id))
        .await?;
    Ok(Json(json!({ "success": true, "data": lot })))
}

/// Operator update: status, grade, sensors, final weight, packing notes
pub async fn update_lot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateLotInput>,
) -> AppResult<impl IntoResponse> {
    let lot_ref = parse_lot_ref(&id)?;
    let lot = lot_service(&state).update_lot(&lot_ref, input).await?;
    Ok(Json(json!({ "success": true, "data": lot })))
}
