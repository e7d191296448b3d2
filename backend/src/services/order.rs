//! Order placement and stock reservation
//!
//! Checkout locks every referenced lot row, validates the whole cart, then
//! applies the stock decrements and writes the order in one transaction. A
//! lot drained to zero flips to SOLD, which runs the same ledger settlement
//! as an operator marking it sold.

use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::ids::{self, OrderRef};
use shared::models::{Lot, LotStatus, Order, OrderItem, OrderStatus, OrderWithItems};
use shared::orders::{plan_order, OrderItemInput};
use shared::settlement::Fees;

use crate::error::{AppError, AppResult};
use crate::services::ledger;
use crate::services::lot::LOT_COLUMNS;
use crate::services::notification::NotificationService;

/// Checkout request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderInput {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Filters for the order list
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

const ORDER_COLUMNS: &str =
    "id, order_id, customer_name, phone, address, total_amount, status, payment_status, \
     created_at, updated_at";

#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
    fees: Fees,
}

impl OrderService {
    pub fn new(db: PgPool, fees: Fees) -> Self {
        Self { db, fees }
    }

    /// Place an order over one or more listed lots.
    pub async fn place_order(&self, input: PlaceOrderInput) -> AppResult<OrderWithItems> {
        if input.items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let (customer_name, phone, address) =
            match (input.customer_name, input.phone, input.address) {
                (Some(n), Some(p), Some(a))
                    if !n.trim().is_empty() && !p.trim().is_empty() && !a.trim().is_empty() =>
                {
                    (n, p, a)
                }
                _ => {
                    return Err(AppError::Validation {
                        field: "customer".to_string(),
                        message: "Missing customer details".to_string(),
                    })
                }
            };

        // Lock referenced lots in a stable order so concurrent checkouts
        // against overlapping carts cannot deadlock.
        let mut lot_ids: Vec<Uuid> = input.items.iter().map(|i| i.lot_id).collect();
        lot_ids.sort();
        lot_ids.dedup();

        let mut tx = self.db.begin().await?;

        let lots = sqlx::query_as::<_, Lot>(&format!(
            "SELECT {LOT_COLUMNS} FROM lots WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(&lot_ids)
        .fetch_all(&mut *tx)
        .await?;

        let mut lot_map: HashMap<Uuid, Lot> = lots.into_iter().map(|l| (l.id, l)).collect();

        let plan = plan_order(&input.items, &lot_map)?;

        let order_id = ids::make_order_id();
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (order_id, customer_name, phone, address, total_amount)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&order_id)
        .bind(customer_name.trim())
        .bind(phone.trim())
        .bind(address.trim())
        .bind(plan.total_amount)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(plan.lines.len());
        for line in &plan.lines {
            let item = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO order_items (order_id, lot_id, qty_kg, price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, order_id, lot_id, qty_kg, price",
            )
            .bind(order.id)
            .bind(line.lot_id)
            .bind(line.qty_kg)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        // Apply stock mutations; depletion forces SOLD and settles the
        // ledger, with this order's lines already on record.
        for mutation in &plan.mutations {
            let lot = lot_map.get_mut(&mutation.lot_id).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("order plan referenced an unloaded lot"))
            })?;
            lot.qty_kg = mutation.new_qty;

            if mutation.becomes_sold {
                lot.status = LotStatus::Sold;
            }

            sqlx::query(
                "UPDATE lots SET qty_kg = $1, status = $2, updated_at = now() WHERE id = $3",
            )
            .bind(lot.qty_kg)
            .bind(lot.status)
            .bind(lot.id)
            .execute(&mut *tx)
            .await?;

            if mutation.becomes_sold {
                ledger::settle_in_tx(&mut tx, lot, &self.fees).await?;
            }
        }

        NotificationService::record(
            &mut tx,
            "ORDER_CREATED",
            &format!(
                "Order placed {} (₹{})",
                order.order_id,
                order.total_amount.normalize()
            ),
            Some(&order.order_id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(order_id = %order.order_id, total = %order.total_amount, "order placed");

        Ok(OrderWithItems { order, items })
    }

    /// Lookup by `ORD-` code first, internal id second.
    pub async fn get_order(&self, order_ref: &OrderRef) -> AppResult<OrderWithItems> {
        let order = self
            .find_order(order_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, lot_id, qty_kg, price FROM order_items WHERE order_id = $1",
        )
        .bind(order.id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderWithItems { order, items })
    }

    /// Recent orders, optionally filtered by status. Limit capped at 200.
    pub async fn list_orders(&self, filter: OrderFilter) -> AppResult<Vec<Order>> {
        let limit = filter.limit.unwrap_or(50).clamp(1, 200);
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC
             LIMIT $2"
        ))
        .bind(filter.status)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(orders)
    }

    /// Change fulfilment status; the enum is the whole contract.
    pub async fn update_status(&self, order_ref: &OrderRef, status: &str) -> AppResult<Order> {
        let status = OrderStatus::from_str(status).ok_or_else(|| AppError::Validation {
            field: "status".to_string(),
            message: "Invalid status".to_string(),
        })?;

        let existing = self
            .find_order(order_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status)
        .bind(existing.id)
        .fetch_one(&mut *tx)
        .await?;

        NotificationService::record(
            &mut tx,
            "ORDER_STATUS",
            &format!(
                "Order {} status updated to {}",
                order.order_id,
                order.status.as_str()
            ),
            Some(&order.order_id),
        )
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn find_order(&self, order_ref: &OrderRef) -> AppResult<Option<Order>> {
        let order = match order_ref {
            OrderRef::Code(code) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
                ))
                .bind(code)
                .fetch_optional(&self.db)
                .await?
            }
            OrderRef::Id(id) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
                ))
                .bind(id)
                .fetch_optional(&self.db)
                .await?
            }
        };
        Ok(order)
    }
}
