//! Demo data bootstrap
//!
//! Idempotent seeding of default hubs and a few demo lots, run once at
//! process startup. The whole thing executes inside one transaction holding
//! a Postgres advisory lock, so concurrent first-starts across processes
//! serialize on a single seeding pass instead of double-inserting.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::ids;
use shared::models::{Grade, LotStatus};
use shared::settlement::advance_for;

use crate::services::notification::NotificationService;

// Advisory lock key for the seeding critical section.
const BOOTSTRAP_LOCK_KEY: i64 = 0x4641_524D;

struct DemoHub {
    name: &'static str,
    location: &'static str,
    capacity_kg: Decimal,
}

struct DemoLot {
    farmer_name: &'static str,
    phone: &'static str,
    village: &'static str,
    crop: &'static str,
    qty_kg: Decimal,
    expected_price: Decimal,
    storage_days: i32,
    grade: Grade,
    status: LotStatus,
    temp: Decimal,
    humidity: Decimal,
}

fn demo_hubs() -> Vec<DemoHub> {
    vec![
        DemoHub {
            name: "FarmFresh Hub - OMR",
            location: "Chennai OMR",
            capacity_kg: dec!(20000),
        },
        DemoHub {
            name: "FarmFresh Hub - Kanchipuram",
            location: "Kanchipuram",
            capacity_kg: dec!(15000),
        },
        DemoHub {
            name: "FarmFresh Hub - Tiruvallur",
            location: "Tiruvallur",
            capacity_kg: dec!(12000),
        },
    ]
}

fn demo_lots() -> Vec<DemoLot> {
    vec![
        DemoLot {
            farmer_name: "Ravi Kumar",
            phone: "9876543210",
            village: "Thoraipakkam",
            crop: "Tomato",
            qty_kg: dec!(180),
            expected_price: dec!(28),
            storage_days: 4,
            grade: Grade::B,
            status: LotStatus::Received,
            temp: dec!(6),
            humidity: dec!(70),
        },
        DemoLot {
            farmer_name: "Meena Devi",
            phone: "9123456780",
            village: "Sriperumbudur",
            crop: "Onion",
            qty_kg: dec!(250),
            expected_price: dec!(22),
            storage_days: 6,
            grade: Grade::A,
            status: LotStatus::Listed,
            temp: dec!(5),
            humidity: dec!(68),
        },
        DemoLot {
            farmer_name: "Lakshmi",
            phone: "9888887777",
            village: "Kelambakkam",
            crop: "Carrot",
            qty_kg: dec!(140),
            expected_price: dec!(40),
            storage_days: 3,
            grade: Grade::A,
            status: LotStatus::Listed,
            temp: dec!(3),
            humidity: dec!(75),
        },
    ]
}

/// Seed default hubs and demo lots when the store is empty. Safe to call
/// from any number of processes at once; only one does the work.
pub async fn ensure_demo_data(pool: &PgPool) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(BOOTSTRAP_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let lot_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lots")
        .fetch_one(&mut *tx)
        .await?;
    if lot_count > 0 {
        tx.commit().await?;
        return Ok(());
    }

    let hub_ids = ensure_hubs(&mut tx).await?;

    for (i, lot) in demo_lots().iter().enumerate() {
        let hub_id = hub_ids[i % hub_ids.len()];
        let lot_id = ids::make_lot_id();
        let qr_string = ids::make_qr_string(&lot_id);

        let internal_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO lots (lot_id, qr_string, hub_id, farmer_name, phone, village, crop,
                               qty_kg, expected_price, storage_days, status, grade, temp, humidity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING id",
        )
        .bind(&lot_id)
        .bind(&qr_string)
        .bind(hub_id)
        .bind(lot.farmer_name)
        .bind(lot.phone)
        .bind(lot.village)
        .bind(lot.crop)
        .bind(lot.qty_kg)
        .bind(lot.expected_price)
        .bind(lot.storage_days)
        .bind(lot.status)
        .bind(lot.grade)
        .bind(lot.temp)
        .bind(lot.humidity)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO payments (lot_id, advance_amount) VALUES ($1, $2)
             ON CONFLICT (lot_id) DO NOTHING",
        )
        .bind(internal_id)
        .bind(advance_for(lot.qty_kg, lot.expected_price))
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE hubs SET current_used_kg = current_used_kg + $1 WHERE id = $2")
            .bind(lot.qty_kg)
            .bind(hub_id)
            .execute(&mut *tx)
            .await?;

        NotificationService::record(
            &mut tx,
            "BOOKING_CREATED",
            &format!(
                "Booking created for {} ({}kg) - {}",
                lot.crop,
                lot.qty_kg.normalize(),
                lot_id
            ),
            Some(&lot_id),
        )
        .await
        .map_err(|e| anyhow::anyhow!("seeding notification failed: {e}"))?;
    }

    tx.commit().await?;
    tracing::info!("demo data seeded");
    Ok(())
}

async fn ensure_hubs(tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<Vec<Uuid>> {
    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM hubs ORDER BY created_at ASC")
        .fetch_all(&mut **tx)
        .await?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    let mut ids = Vec::new();
    for hub in demo_hubs() {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO hubs (name, location, capacity_kg) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(hub.name)
        .bind(hub.location)
        .bind(hub.capacity_kg)
        .fetch_one(&mut **tx)
        .await?;
        ids.push(id);
    }
    Ok(ids)
}
