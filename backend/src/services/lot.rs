//! Lot lifecycle service: booking, listing, operator updates
//!
//! Booking is one transaction end to end: hub admission, lot insert, ledger
//! advance and the booking notification either all commit or none do, so the
//! hub's used-capacity counter can never drift from the set of persisted
//! lots.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::ids::{self, LotRef};
use shared::lifecycle::{self, LifecycleEffect, UpdateLotInput};
use shared::models::{Grade, Lot, LotStatus, LotWithHub};
use shared::settlement::{self, Fees};
use shared::validation::{validate_booking, CreateLotInput};

use crate::error::{AppError, AppResult};
use crate::services::hub::HubService;
use crate::services::ledger;
use crate::services::notification::NotificationService;

pub(crate) const LOT_COLUMNS: &str =
    "id, lot_id, qr_string, hub_id, farmer_name, phone, village, crop, qty_kg, \
     expected_price, storage_days, status, grade, temp, humidity, final_weight_kg, \
     packing_notes, created_at, updated_at";

const LOT_WITH_HUB_SELECT: &str =
    "SELECT l.id, l.lot_id, l.qr_string, l.hub_id, l.farmer_name, l.phone, l.village, \
            l.crop, l.qty_kg, l.expected_price, l.storage_days, l.status, l.grade, \
            l.temp, l.humidity, l.final_weight_kg, l.packing_notes, l.created_at, \
            l.updated_at, h.name AS hub_name, h.location AS hub_location \
     FROM lots l \
     JOIN hubs h ON h.id = l.hub_id";

/// Resolve a lot (with hub display fields) by internal id or human code.
pub(crate) async fn find_lot_with_hub(
    db: &PgPool,
    lot_ref: &LotRef,
) -> AppResult<Option<LotWithHub>> {
    let row = match lot_ref {
        LotRef::Id(id) => {
            sqlx::query_as::<_, LotWithHub>(&format!("{LOT_WITH_HUB_SELECT} WHERE l.id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?
        }
        LotRef::Code(code) => {
            sqlx::query_as::<_, LotWithHub>(&format!("{LOT_WITH_HUB_SELECT} WHERE l.lot_id = $1"))
                .bind(code)
                .fetch_optional(db)
                .await?
        }
    };
    Ok(row)
}

/// Filters for the operator dashboard list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotFilter {
    pub status: Option<String>,
    pub hub_id: Option<Uuid>,
    pub crop: Option<String>,
    pub q: Option<String>,
}

/// Filters for a farmer's own lots
#[derive(Debug, Default, Deserialize)]
pub struct FarmerLotFilter {
    pub phone: Option<String>,
    pub q: Option<String>,
}

#[derive(Clone)]
pub struct LotService {
    db: PgPool,
    fees: Fees,
}

impl LotService {
    pub fn new(db: PgPool, fees: Fees) -> Self {
        Self { db, fees }
    }

    /// Create a booking: admit into the hub, persist the lot with default
    /// sensor/grade values, open the ledger with the farmer advance and emit
    /// BOOKING_CREATED. Returns the lot and the advance amount.
    pub async fn create_lot(&self, input: CreateLotInput) -> AppResult<(Lot, Decimal)> {
        let booking = validate_booking(input)?;

        let lot_id = ids::make_lot_id();
        let qr_string = ids::make_qr_string(&lot_id);
        let advance = settlement::advance_for(booking.qty_kg, booking.expected_price);

        let mut tx = self.db.begin().await?;

        HubService::admit_booking(&mut tx, booking.hub_id, booking.qty_kg).await?;

        let lot = sqlx::query_as::<_, Lot>(&format!(
            "INSERT INTO lots (lot_id, qr_string, hub_id, farmer_name, phone, village, crop, \
                               qty_kg, expected_price, storage_days, status, grade, temp, humidity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {LOT_COLUMNS}"
        ))
        .bind(&lot_id)
        .bind(&qr_string)
        .bind(booking.hub_id)
        .bind(&booking.farmer_name)
        .bind(&booking.phone)
        .bind(&booking.village)
        .bind(&booking.crop)
        .bind(booking.qty_kg)
        .bind(booking.expected_price)
        .bind(booking.storage_days)
        .bind(LotStatus::Received)
        .bind(Grade::B)
        .bind(Decimal::from(6))
        .bind(Decimal::from(70))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO payments (lot_id, advance_amount) VALUES ($1, $2)")
            .bind(lot.id)
            .bind(advance)
            .execute(&mut *tx)
            .await?;

        NotificationService::record(
            &mut tx,
            "BOOKING_CREATED",
            &format!(
                "Booking created for {} ({}kg) - {}",
                lot.crop,
                lot.qty_kg.normalize(),
                lot.lot_id
            ),
            Some(&lot.lot_id),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(lot_id = %lot.lot_id, hub_id = %lot.hub_id, "booking created");

        Ok((lot, advance))
    }

    /// Dashboard list with status/hub/crop filters and free-text search.
    pub async fn list_lots(&self, filter: LotFilter) -> AppResult<Vec<LotWithHub>> {
        let lots = sqlx::query_as::<_, LotWithHub>(&format!(
            "{LOT_WITH_HUB_SELECT}
             WHERE ($1::text IS NULL OR l.status = $1)
               AND ($2::uuid IS NULL OR l.hub_id = $2)
               AND ($3::text IS NULL OR l.crop = $3)
               AND ($4::text IS NULL
                    OR l.lot_id ILIKE '%' || $4 || '%'
                    OR l.farmer_name ILIKE '%' || $4 || '%'
                    OR l.crop ILIKE '%' || $4 || '%'
                    OR l.village ILIKE '%' || $4 || '%')
             ORDER BY l.created_at DESC"
        ))
        .bind(filter.status)
        .bind(filter.hub_id)
        .bind(filter.crop)
        .bind(filter.q)
        .fetch_all(&self.db)
        .await?;
        Ok(lots)
    }

    /// A farmer's lots, looked up by phone with optional search.
    pub async fn farmer_lots(&self, filter: FarmerLotFilter) -> AppResult<Vec<LotWithHub>> {
        let phone = filter.phone.map(|p| p.trim().to_string());
        let lots = sqlx::query_as::<_, LotWithHub>(&format!(
            "{LOT_WITH_HUB_SELECT}
             WHERE ($1::text IS NULL OR l.phone = $1)
               AND ($2::text IS NULL
                    OR l.lot_id ILIKE '%' || $2 || '%'
                    OR l.crop ILIKE '%' || $2 || '%'
                    OR l.village ILIKE '%' || $2 || '%')
             ORDER BY l.created_at DESC"
        ))
        .bind(phone)
        .bind(filter.q)
        .fetch_all(&self.db)
        .await?;
        Ok(lots)
    }

    /// Lookup by internal id or `LOT-` code.
    pub async fn get_lot(&self, lot_ref: &LotRef) -> AppResult<LotWithHub> {
        find_lot_with_hub(&self.db, lot_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))
    }

    /// Operator update: status, grade, sensors, final weight, packing notes.
    ///
    /// The patched lot and every effect it produces (ledger settlement on
    /// SOLD/SETTLED, the LOT_UPDATED event) commit in one transaction.
    pub async fn update_lot(&self, lot_ref: &LotRef, input: UpdateLotInput) -> AppResult<Lot> {
        let patch = input.into_patch()?;

        let mut tx = self.db.begin().await?;

        let query = match lot_ref {
            LotRef::Id(_) => {
                format!("SELECT {LOT_COLUMNS} FROM lots WHERE id = $1 FOR UPDATE")
            }
            LotRef::Code(_) => {
                format!("SELECT {LOT_COLUMNS} FROM lots WHERE lot_id = $1 FOR UPDATE")
            }
        };
        let mut lot = match lot_ref {
            LotRef::Id(id) => sqlx::query_as::<_, Lot>(&query).bind(id),
            LotRef::Code(code) => sqlx::query_as::<_, Lot>(&query).bind(code),
        }
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        let effects = lifecycle::apply_patch(&mut lot, &patch);

        let lot = sqlx::query_as::<_, Lot>(&format!(
            "UPDATE lots
             SET status = $1, grade = $2, temp = $3, humidity = $4,
                 final_weight_kg = $5, packing_notes = $6, updated_at = now()
             WHERE id = $7
             RETURNING {LOT_COLUMNS}"
        ))
        .bind(lot.status)
        .bind(lot.grade)
        .bind(lot.temp)
        .bind(lot.humidity)
        .bind(lot.final_weight_kg)
        .bind(&lot.packing_notes)
        .bind(lot.id)
        .fetch_one(&mut *tx)
        .await?;

        for effect in effects {
            match effect {
                LifecycleEffect::RecomputeSettlement { .. } => {
                    ledger::settle_in_tx(&mut tx, &lot, &self.fees).await?;
                }
                LifecycleEffect::Notify { kind, message } => {
                    NotificationService::record(&mut tx, &kind, &message, Some(&lot.lot_id))
                        .await?;
                }
            }
        }

        tx.commit().await?;

        tracing::debug!(lot_id = %lot.lot_id, status = lot.status.as_str(), "lot updated");

        Ok(lot)
    }
}
