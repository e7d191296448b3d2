//! Order HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use shared::ids::OrderRef;

use crate::error::{AppError, AppResult};
use crate::external::PaymentGatewayClient;
use crate::services::order::{OrderFilter, OrderService, PlaceOrderInput};
use crate::AppState;

fn order_service(state: &AppState) -> OrderService {
    OrderService::new(state.db.clone(), state.config.fees.to_fees())
}

fn parse_order_ref(raw: &str) -> AppResult<OrderRef> {
    OrderRef::parse(raw).ok_or_else(|| AppError::Validation {
        field: "id".to_string(),
        message: "Invalid order id".to_string(),
    })
}

/// Place an order over listed lots
pub async fn place_order(
    State(state): State<AppState>,
    Json(input): Json<PlaceOrderInput>,
) -> AppResult<impl IntoResponse> {
    let order = order_service(&state).place_order(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": order })),
    ))
}

/// Recent orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<impl IntoResponse> {
    let orders = order_service(&state).list_orders(filter).await?;
    Ok(Json(json!({ "success": true, "data": orders })))
}

/// Order lookup by ORD- code or internal id
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let order_ref = parse_order_ref(&id)?;
    let order = order_service(&state).get_order(&order_ref).await?;
    Ok(Json(json!({ "success": true, "data": order })))
}

/// Open a payment order at the external gateway for a placed order.
///
/// The lifecycle core never calls the gateway; this is the one seam where
/// the checkout flow hands off to the external processor.
pub async fn initiate_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let order_ref = parse_order_ref(&id)?;
    let order = order_service(&state).get_order(&order_ref).await?;

    let gateway = PaymentGatewayClient::new(&state.config.payment_gateway);
    let gateway_order = gateway
        .create_payment_order(&order.order.order_id, order.order.total_amount)
        .await?;

    Ok(Json(json!({ "success": true, "data": gateway_order })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusInput {
    pub status: String,
}

/// Change an order's fulfilment status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateOrderStatusInput>,
) -> AppResult<impl IntoResponse> {
    let order_ref = parse_order_ref(&id)?;
    let order = order_service(&state)
        .update_status(&order_ref, &input.status)
        .await?;
    Ok(Json(json!({ "success": true, "data": order })))
}
