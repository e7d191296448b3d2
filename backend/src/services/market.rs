//! Public marketplace: listed lots and provenance traces

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::ids::LotRef;
use shared::models::LotWithHub;

use crate::error::{AppError, AppResult};
use crate::services::lot::find_lot_with_hub;

/// Consumer-facing search filters; only LISTED lots are ever returned.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFilter {
    pub crop: Option<String>,
    pub hub_id: Option<Uuid>,
    pub grade: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub q: Option<String>,
}

/// One step of a lot's provenance timeline
#[derive(Debug, Serialize)]
pub struct TraceStep {
    pub step: &'static str,
    pub at: DateTime<Utc>,
    pub note: String,
}

/// Lot detail plus its provenance timeline
#[derive(Debug, Serialize)]
pub struct TraceView {
    pub lot: LotWithHub,
    pub timeline: Vec<TraceStep>,
}

#[derive(Clone)]
pub struct MarketService {
    db: PgPool,
}

impl MarketService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Public listing: LISTED lots with search and filters.
    pub async fn market_lots(&self, filter: MarketFilter) -> AppResult<Vec<LotWithHub>> {
        let lots = sqlx::query_as::<_, LotWithHub>(
            "SELECT l.id, l.lot_id, l.qr_string, l.hub_id, l.farmer_name, l.phone, l.village,
                    l.crop, l.qty_kg, l.expected_price, l.storage_days, l.status, l.grade,
                    l.temp, l.humidity, l.final_weight_kg, l.packing_notes, l.created_at,
                    l.updated_at, h.name AS hub_name, h.location AS hub_location
             FROM lots l
             JOIN hubs h ON h.id = l.hub_id
             WHERE l.status = 'LISTED'
               AND ($1::text IS NULL OR l.crop = $1)
               AND ($2::uuid IS NULL OR l.hub_id = $2)
               AND ($3::text IS NULL OR l.grade = $3)
               AND ($4::numeric IS NULL OR l.expected_price >= $4)
               AND ($5::numeric IS NULL OR l.expected_price <= $5)
               AND ($6::text IS NULL
                    OR l.crop ILIKE '%' || $6 || '%'
                    OR l.lot_id ILIKE '%' || $6 || '%')
             ORDER BY l.created_at DESC",
        )
        .bind(filter.crop)
        .bind(filter.hub_id)
        .bind(filter.grade)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.q)
        .fetch_all(&self.db)
        .await?;
        Ok(lots)
    }

    /// Provenance timeline for one lot: farm booking, hub assignment, storage
    /// conditions and current status.
    pub async fn trace(&self, lot_ref: &LotRef) -> AppResult<TraceView> {
        let lot = find_lot_with_hub(&self.db, lot_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Lot".to_string()))?;

        let temp = lot
            .lot
            .temp
            .map(|t| t.normalize().to_string())
            .unwrap_or_else(|| "—".to_string());
        let humidity = lot
            .lot
            .humidity
            .map(|h| h.normalize().to_string())
            .unwrap_or_else(|| "—".to_string());

        let timeline = vec![
            TraceStep {
                step: "FARM",
                at: lot.lot.created_at,
                note: format!(
                    "{} booked {} from {}",
                    lot.lot.farmer_name, lot.lot.crop, lot.lot.village
                ),
            },
            TraceStep {
                step: "HUB",
                at: lot.lot.created_at,
                note: format!("Assigned to hub: {}", lot.hub_name),
            },
            TraceStep {
                step: "STORAGE",
                at: lot.lot.updated_at,
                note: format!("Temp: {temp}°C, Humidity: {humidity}%"),
            },
            TraceStep {
                step: "STATUS",
                at: lot.lot.updated_at,
                note: format!("Current status: {}", lot.lot.status.as_str()),
            },
        ];

        Ok(TraceView { lot, timeline })
    }
}
