//! Sensor safe-range evaluation for lots in storage
//!
//! Pure read-side check: no state is persisted. A missing sensor reading is
//! simply non-alerting for that dimension, not an error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl SensorRange {
    /// Inclusive on both bounds.
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Safe storage conditions; configurable per deployment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SafeRanges {
    pub temp: SensorRange,
    pub humidity: SensorRange,
}

impl Default for SafeRanges {
    fn default() -> Self {
        Self {
            temp: SensorRange {
                min: dec!(2),
                max: dec!(8),
            },
            humidity: SensorRange {
                min: dec!(60),
                max: dec!(85),
            },
        }
    }
}

/// Evaluate one lot's readings against the safe ranges.
///
/// Returns one human-readable reason per violated dimension; empty means the
/// lot is not alerting.
pub fn evaluate(
    temp: Option<Decimal>,
    humidity: Option<Decimal>,
    ranges: &SafeRanges,
) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(t) = temp {
        if !ranges.temp.contains(t) {
            issues.push(format!(
                "Temp out of range ({}-{}°C)",
                ranges.temp.min, ranges.temp.max
            ));
        }
    }

    if let Some(h) = humidity {
        if !ranges.humidity.contains(h) {
            issues.push(format!(
                "Humidity out of range ({}-{}%)",
                ranges.humidity.min, ranges.humidity.max
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_readings_never_alert() {
        let issues = evaluate(Some(dec!(6)), Some(dec!(70)), &SafeRanges::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn hot_lot_alerts_on_temperature() {
        let issues = evaluate(Some(dec!(10)), Some(dec!(70)), &SafeRanges::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Temp out of range"));
    }

    #[test]
    fn missing_temp_only_flags_humidity() {
        let issues = evaluate(None, Some(dec!(90)), &SafeRanges::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Humidity out of range"));
    }

    #[test]
    fn bounds_are_inclusive_safe() {
        let ranges = SafeRanges::default();
        assert!(evaluate(Some(dec!(2)), Some(dec!(60)), &ranges).is_empty());
        assert!(evaluate(Some(dec!(8)), Some(dec!(85)), &ranges).is_empty());
        assert_eq!(evaluate(Some(dec!(1.9)), Some(dec!(85.1)), &ranges).len(), 2);
    }

    #[test]
    fn no_readings_means_no_alert() {
        assert!(evaluate(None, None, &SafeRanges::default()).is_empty());
    }
}
