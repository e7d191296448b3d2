//! Storage-condition alerts
//!
//! Read-side only: lots still in the storage pipeline are checked against
//! the configured safe ranges on every request; nothing is persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::alerts::{evaluate, SafeRanges};
use shared::models::{LotStatus, LotWithHub};

use crate::error::AppResult;

/// One alerting lot with its violated conditions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LotAlert {
    pub id: Uuid,
    pub lot_id: String,
    pub crop: String,
    pub status: LotStatus,
    pub hub_name: String,
    pub hub_location: String,
    pub temp: Option<Decimal>,
    pub humidity: Option<Decimal>,
    pub issues: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Alert listing with the ranges it was evaluated against
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsView {
    pub safe_ranges: SafeRanges,
    pub count: usize,
    pub alerts: Vec<LotAlert>,
}

#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
    ranges: SafeRanges,
}

impl AlertService {
    pub fn new(db: PgPool, ranges: SafeRanges) -> Self {
        Self { db, ranges }
    }

    /// Evaluate every pipeline lot (RECEIVED/STORED/LISTED) and return the
    /// ones out of range.
    pub async fn current_alerts(&self) -> AppResult<AlertsView> {
        let lots = sqlx::query_as::<_, LotWithHub>(
            "SELECT l.id, l.lot_id, l.qr_string, l.hub_id, l.farmer_name, l.phone, l.village,
                    l.crop, l.qty_kg, l.expected_price, l.storage_days, l.status, l.grade,
                    l.temp, l.humidity, l.final_weight_kg, l.packing_notes, l.created_at,
                    l.updated_at, h.name AS hub_name, h.location AS hub_location
             FROM lots l
             JOIN hubs h ON h.id = l.hub_id
             WHERE l.status IN ('RECEIVED', 'STORED', 'LISTED')
             ORDER BY l.updated_at DESC",
        )
        .fetch_all(&self.db)
        .await?;

        let alerts: Vec<LotAlert> = lots
            .into_iter()
            .filter_map(|row| {
                let issues = evaluate(row.lot.temp, row.lot.humidity, &self.ranges);
                if issues.is_empty() {
                    return None;
                }
                Some(LotAlert {
                    id: row.lot.id,
                    lot_id: row.lot.lot_id,
                    crop: row.lot.crop,
                    status: row.lot.status,
                    hub_name: row.hub_name,
                    hub_location: row.hub_location,
                    temp: row.lot.temp,
                    humidity: row.lot.humidity,
                    issues,
                    updated_at: row.lot.updated_at,
                })
            })
            .collect();

        Ok(AlertsView {
            safe_ranges: self.ranges,
            count: alerts.len(),
            alerts,
        })
    }
}
