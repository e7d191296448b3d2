//! Lot state machine
//!
//! Operators may reassign status freely; no forward-only ordering is
//! enforced. The one hard rule lives here: whenever the *new* status is SOLD
//! or SETTLED, the ledger settlement must be recomputed, regardless of what
//! the previous status was. The transition itself is pure; it mutates the
//! lot in memory and hands back a list of effects for the caller to apply
//! inside its transaction.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DomainError;
use crate::models::{Grade, Lot, LotStatus};

/// Raw operator update as it arrives over the wire. Sensor and weight fields
/// are kept loose so malformed values surface as validation errors rather
/// than body-rejection noise.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLotInput {
    pub status: Option<String>,
    pub grade: Option<String>,
    pub final_weight_kg: Option<Value>,
    pub packing_notes: Option<String>,
    pub temp: Option<Value>,
    pub humidity: Option<Value>,
}

/// Validated partial update to a lot
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LotPatch {
    pub status: Option<LotStatus>,
    pub grade: Option<Grade>,
    /// Outer option: field present; inner option: explicit null clears it.
    pub final_weight_kg: Option<Option<Decimal>>,
    pub packing_notes: Option<String>,
    pub temp: Option<Decimal>,
    pub humidity: Option<Decimal>,
}

/// Side effects the caller must apply transactionally after persisting the
/// patched lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEffect {
    /// Upsert the ledger row from a fresh settlement computation. The advance
    /// is read from the existing record (zero when absent); `mark_settled`
    /// stamps `settled_at` only for SETTLED, clearing it otherwise.
    RecomputeSettlement { mark_settled: bool },
    /// Append an event to the notification sink.
    Notify { kind: String, message: String },
}

fn numeric(field: &str, value: &Value) -> Result<Decimal, DomainError> {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .map_err(|_| DomainError::validation(field, format!("{field} must be a number"))),
        _ => Err(DomainError::validation(
            field,
            format!("{field} must be a number"),
        )),
    }
}

impl UpdateLotInput {
    /// Validate the raw input into a typed patch.
    pub fn into_patch(self) -> Result<LotPatch, DomainError> {
        let mut patch = LotPatch::default();

        if let Some(status) = self.status {
            patch.status = Some(
                LotStatus::from_str(&status)
                    .ok_or_else(|| DomainError::validation("status", "Invalid status"))?,
            );
        }

        if let Some(grade) = self.grade {
            patch.grade = Some(match grade.as_str() {
                "A" => Grade::A,
                "B" => Grade::B,
                "C" => Grade::C,
                _ => return Err(DomainError::validation("grade", "Invalid grade")),
            });
        }

        if let Some(raw) = self.final_weight_kg {
            patch.final_weight_kg = Some(match raw {
                Value::Null => None,
                other => {
                    let weight = numeric("finalWeightKg", &other).map_err(|_| {
                        DomainError::validation(
                            "finalWeightKg",
                            "finalWeightKg must be >= 0 or null",
                        )
                    })?;
                    if weight < Decimal::ZERO {
                        return Err(DomainError::validation(
                            "finalWeightKg",
                            "finalWeightKg must be >= 0 or null",
                        ));
                    }
                    Some(weight)
                }
            });
        }

        if let Some(notes) = self.packing_notes {
            patch.packing_notes = Some(notes);
        }

        // Explicit null leaves a sensor reading unchanged.
        if let Some(raw) = self.temp {
            if !raw.is_null() {
                patch.temp = Some(numeric("temp", &raw)?);
            }
        }

        if let Some(raw) = self.humidity {
            if !raw.is_null() {
                patch.humidity = Some(numeric("humidity", &raw)?);
            }
        }

        Ok(patch)
    }
}

/// Apply an operator patch to a lot, returning the effects to run.
pub fn apply_patch(lot: &mut Lot, patch: &LotPatch) -> Vec<LifecycleEffect> {
    if let Some(status) = patch.status {
        lot.status = status;
    }
    if let Some(grade) = patch.grade {
        lot.grade = Some(grade);
    }
    if let Some(weight) = &patch.final_weight_kg {
        lot.final_weight_kg = *weight;
    }
    if let Some(notes) = &patch.packing_notes {
        lot.packing_notes = Some(notes.clone());
    }
    if let Some(temp) = patch.temp {
        lot.temp = Some(temp);
    }
    if let Some(humidity) = patch.humidity {
        lot.humidity = Some(humidity);
    }

    let mut effects = Vec::new();

    if lot.status.triggers_settlement() {
        effects.push(LifecycleEffect::RecomputeSettlement {
            mark_settled: lot.status == LotStatus::Settled,
        });
    }

    effects.push(LifecycleEffect::Notify {
        kind: "LOT_UPDATED".to_string(),
        message: format!(
            "Lot {} updated (status: {}, grade: {})",
            lot.lot_id,
            lot.status.as_str(),
            lot.grade.map(|g| g.as_str()).unwrap_or("-"),
        ),
    });

    effects
}
