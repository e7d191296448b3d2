//! Ledger / payment record management
//!
//! One record per lot. The advance is written at booking and never changes;
//! deductions and the final amount are recomputed from scratch every time a
//! lot enters SOLD or SETTLED.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use shared::ids::LotRef;
use shared::models::{Deduction, Lot, LotStatus, LotWithHub, Payment};
use shared::settlement::{self, Fees};

use crate::error::{AppError, AppResult};
use crate::services::lot::find_lot_with_hub;

#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Ledger entry as exposed over the API; zeroed when no record exists yet.
#[derive(Debug, Serialize)]
pub struct LedgerEntryView {
    pub advance_amount: Decimal,
    pub deductions: Vec<Deduction>,
    pub final_amount: Decimal,
    pub settled_at: Option<DateTime<Utc>>,
}

impl LedgerEntryView {
    fn absent() -> Self {
        Self {
            advance_amount: Decimal::ZERO,
            deductions: Vec::new(),
            final_amount: Decimal::ZERO,
            settled_at: None,
        }
    }
}

/// Full ledger view for one lot
#[derive(Debug, Serialize)]
pub struct LedgerView {
    pub lot: LotWithHub,
    pub estimated_value: Decimal,
    pub payment: LedgerEntryView,
}

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Ledger view for a lot: summary, estimated value and the payment record.
    pub async fn lot_ledger(&self, lot_ref: &LotRef) -> AppResult<LedgerView> {
        let lot = find_lot_with_hub(&self.db, lot_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        let payment = sqlx::query_as::<_, Payment>(
            "SELECT id, lot_id, advance_amount, deductions, final_amount, settled_at,
                    created_at, updated_at
             FROM payments
             WHERE lot_id = $1",
        )
        .bind(lot.lot.id)
        .fetch_optional(&self.db)
        .await?;

        let estimated_value = lot.lot.estimated_value();

        Ok(LedgerView {
            payment: payment
                .map(|p| LedgerEntryView {
                    advance_amount: p.advance_amount,
                    deductions: p.deductions.0,
                    final_amount: p.final_amount,
                    settled_at: p.settled_at,
                })
                .unwrap_or_else(LedgerEntryView::absent),
            estimated_value,
            lot,
        })
    }
}

/// Recompute and upsert the settlement for a lot entering SOLD or SETTLED.
///
/// Shared by the operator update path and the stock-depletion path; both
/// converge on the same rule. The sold value is the remaining quantity at
/// the booked price plus the revenue of every order line placed against the
/// lot, so a lot drained to zero settles on what it actually sold for. The
/// advance is read from the existing record (zero when absent) and is never
/// modified by the upsert.
pub async fn settle_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    lot: &Lot,
    fees: &Fees,
) -> AppResult<()> {
    let advance =
        sqlx::query_scalar::<_, Decimal>("SELECT advance_amount FROM payments WHERE lot_id = $1")
            .bind(lot.id)
            .fetch_optional(&mut **tx)
            .await?
            .unwrap_or(Decimal::ZERO);

    let ordered_revenue = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(qty_kg * price), 0) FROM order_items WHERE lot_id = $1",
    )
    .bind(lot.id)
    .fetch_one(&mut **tx)
    .await?;

    let sold_value = lot.qty_kg * lot.expected_price + ordered_revenue;
    let settlement = settlement::compute_from_value(sold_value, advance, fees);
    let settled_at = (lot.status == LotStatus::Settled).then(Utc::now);

    sqlx::query(
        "INSERT INTO payments (lot_id, advance_amount, deductions, final_amount, settled_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (lot_id) DO UPDATE
         SET deductions = EXCLUDED.deductions,
             final_amount = EXCLUDED.final_amount,
             settled_at = EXCLUDED.settled_at,
             updated_at = now()",
    )
    .bind(lot.id)
    .bind(advance)
    .bind(Json(&settlement.deductions))
    .bind(settlement.final_amount)
    .bind(settled_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
