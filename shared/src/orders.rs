//! Order planning over listed lots
//!
//! Checkout is validated in full before any stock is touched: every line is
//! checked against the live lot, prices are frozen into the plan, and only
//! then are the per-lot quantity mutations produced. A lot drained to zero
//! is clamped there and forced to SOLD, which routes through the same
//! settlement rule as an operator marking it SOLD.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Lot, LotStatus};
use crate::settlement::round_currency;

/// One cart line as submitted by the consumer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub lot_id: Uuid,
    pub qty_kg: Value,
}

/// A validated, price-frozen order line
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLine {
    pub lot_id: Uuid,
    pub qty_kg: Decimal,
    pub price: Decimal,
}

/// Stock mutation to apply to one lot
#[derive(Debug, Clone, PartialEq)]
pub struct LotMutation {
    pub lot_id: Uuid,
    pub new_qty: Decimal,
    pub becomes_sold: bool,
}

/// Fully validated checkout plan
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlan {
    pub lines: Vec<PlannedLine>,
    pub total_amount: Decimal,
    pub mutations: Vec<LotMutation>,
}

fn parse_qty(raw: &Value) -> Result<Decimal, DomainError> {
    let qty = match raw {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .map_err(|_| DomainError::InvalidQuantity)?,
        _ => return Err(DomainError::InvalidQuantity),
    };
    if qty <= Decimal::ZERO {
        return Err(DomainError::InvalidQuantity);
    }
    Ok(qty)
}

/// Validate a cart against the referenced lots and produce the plan.
///
/// `lots` holds the current state of every lot the cart references, keyed by
/// internal id. No mutation is planned unless every line passes.
pub fn plan_order(
    items: &[OrderItemInput],
    lots: &HashMap<Uuid, Lot>,
) -> Result<OrderPlan, DomainError> {
    if items.is_empty() {
        return Err(DomainError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for item in items {
        let lot = lots
            .get(&item.lot_id)
            .ok_or_else(|| DomainError::NotFound("Lot".to_string()))?;

        if lot.status != LotStatus::Listed {
            return Err(DomainError::NotListed(lot.lot_id.clone()));
        }

        let qty = parse_qty(&item.qty_kg)?;

        if qty > lot.qty_kg {
            return Err(DomainError::InsufficientStock {
                lot_id: lot.lot_id.clone(),
                available: lot.qty_kg.normalize().to_string(),
            });
        }

        // Price is frozen into the line at plan time.
        total += qty * lot.expected_price;
        lines.push(PlannedLine {
            lot_id: lot.id,
            qty_kg: qty,
            price: lot.expected_price,
        });
    }

    // Fold lines into per-lot decrements, clamping at zero.
    let mut remaining: HashMap<Uuid, Decimal> = HashMap::new();
    let mut order_of_first_touch = Vec::new();
    for line in &lines {
        let entry = remaining.entry(line.lot_id).or_insert_with(|| {
            order_of_first_touch.push(line.lot_id);
            lots[&line.lot_id].qty_kg
        });
        *entry -= line.qty_kg;
    }

    let mutations = order_of_first_touch
        .into_iter()
        .map(|lot_id| {
            let left = remaining[&lot_id].max(Decimal::ZERO);
            LotMutation {
                lot_id,
                new_qty: left,
                becomes_sold: left.is_zero(),
            }
        })
        .collect();

    Ok(OrderPlan {
        lines,
        total_amount: round_currency(total),
        mutations,
    })
}
