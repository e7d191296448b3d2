//! Notification sink
//!
//! Append-only event log the core writes to. Delivery and scheduling are
//! someone else's problem; records are inserted inside the caller's
//! transaction so an event is never visible for work that did not commit.

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::AppResult;
use crate::models::Notification;

#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

impl NotificationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append an event within an open transaction.
    pub async fn record(
        tx: &mut Transaction<'_, Postgres>,
        kind: &str,
        message: &str,
        related_id: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO notifications (kind, message, related_id) VALUES ($1, $2, $3)")
            .bind(kind)
            .bind(message)
            .bind(related_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Most recent events, newest first.
    pub async fn list(&self, limit: i64) -> AppResult<Vec<Notification>> {
        let limit = limit.clamp(1, 200);
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT id, kind, message, related_id, created_at
             FROM notifications
             ORDER BY created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
