//! Hub registry and admission control
//!
//! Hub capacity is consumed by bookings and never released: lots are never
//! deleted and sale decrements do not refund capacity. That asymmetry is
//! deliberate (flagged for product review in DESIGN.md).

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Hub;

#[derive(Clone)]
pub struct HubService {
    db: PgPool,
}

impl HubService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All hubs, newest first.
    pub async fn list_hubs(&self) -> AppResult<Vec<Hub>> {
        let hubs = sqlx::query_as::<_, Hub>(
            "SELECT id, name, location, capacity_kg, current_used_kg, created_at
             FROM hubs
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(hubs)
    }

    /// Reserve capacity for a booking inside the caller's transaction.
    ///
    /// The guarded UPDATE takes a row lock on the hub, so concurrent bookings
    /// serialize on the check-and-increment and a lost race surfaces as
    /// `CapacityExceeded` rather than an over-committed hub.
    pub async fn admit_booking(
        tx: &mut Transaction<'_, Postgres>,
        hub_id: Uuid,
        qty_kg: Decimal,
    ) -> AppResult<()> {
        let updated = sqlx::query(
            "UPDATE hubs
             SET current_used_kg = current_used_kg + $1
             WHERE id = $2 AND current_used_kg + $1 <= capacity_kg",
        )
        .bind(qty_kg)
        .bind(hub_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

        if updated == 1 {
            return Ok(());
        }

        // Distinguish an unknown hub from a full one.
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM hubs WHERE id = $1")
            .bind(hub_id)
            .fetch_one(&mut **tx)
            .await?;

        if exists == 0 {
            Err(AppError::NotFound("Hub".to_string()))
        } else {
            Err(AppError::CapacityExceeded)
        }
    }
}
