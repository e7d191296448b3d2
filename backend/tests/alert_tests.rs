//! Storage alert evaluation tests
//!
//! Safe-range checks over operator-entered temperature and humidity, with
//! null readings treated as non-alerting.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::alerts::{evaluate, SafeRanges, SensorRange};
use shared::models::LotStatus;

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn default_conditions_are_safe() {
    assert!(evaluate(Some(dec!(6)), Some(dec!(70)), &SafeRanges::default()).is_empty());
}

#[test]
fn high_temperature_alerts_with_temperature_reason() {
    let issues = evaluate(Some(dec!(10)), Some(dec!(70)), &SafeRanges::default());
    assert_eq!(issues, vec!["Temp out of range (2-8°C)".to_string()]);
}

#[test]
fn null_temp_with_high_humidity_alerts_only_for_humidity() {
    let issues = evaluate(None, Some(dec!(90)), &SafeRanges::default());
    assert_eq!(issues, vec!["Humidity out of range (60-85%)".to_string()]);
}

#[test]
fn both_dimensions_can_alert_at_once() {
    let issues = evaluate(Some(dec!(0)), Some(dec!(95)), &SafeRanges::default());
    assert_eq!(issues.len(), 2);
}

#[test]
fn boundary_readings_are_safe() {
    let ranges = SafeRanges::default();
    for (t, h) in [(dec!(2), dec!(60)), (dec!(8), dec!(85))] {
        assert!(evaluate(Some(t), Some(h), &ranges).is_empty());
    }
}

#[test]
fn custom_ranges_shift_the_boundaries() {
    let ranges = SafeRanges {
        temp: SensorRange {
            min: dec!(-5),
            max: dec!(0),
        },
        humidity: SensorRange {
            min: dec!(30),
            max: dec!(50),
        },
    };
    assert!(evaluate(Some(dec!(-3)), Some(dec!(40)), &ranges).is_empty());
    assert_eq!(evaluate(Some(dec!(6)), Some(dec!(70)), &ranges).len(), 2);
}

#[test]
fn only_pipeline_statuses_are_evaluated() {
    assert!(LotStatus::Received.in_storage_pipeline());
    assert!(LotStatus::Stored.in_storage_pipeline());
    assert!(LotStatus::Listed.in_storage_pipeline());
    assert!(!LotStatus::Sold.in_storage_pipeline());
    assert!(!LotStatus::Settled.in_storage_pipeline());
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Readings inside the configured ranges never alert.
    #[test]
    fn in_range_readings_never_alert(t in 20u32..80, h in 600u32..850) {
        // temp 2.0..=8.0 and humidity 60.0..=85.0 in tenths
        let temp = Decimal::new(t as i64, 1);
        let humidity = Decimal::new(h as i64, 1);
        prop_assert!(evaluate(Some(temp), Some(humidity), &SafeRanges::default()).is_empty());
    }

    /// A reading outside a range always names that dimension.
    #[test]
    fn out_of_range_temp_always_reported(t in 81u32..500) {
        let temp = Decimal::new(t as i64, 1); // strictly above 8.0
        let issues = evaluate(Some(temp), Some(dec!(70)), &SafeRanges::default());
        prop_assert_eq!(issues.len(), 1);
        prop_assert!(issues[0].contains("Temp"));
    }

    /// Missing readings are never an error and never alert on their own.
    #[test]
    fn null_readings_are_tolerated(h in 0u32..1_000) {
        let humidity = Decimal::new(h as i64, 1);
        let issues = evaluate(None, Some(humidity), &SafeRanges::default());
        for issue in &issues {
            prop_assert!(issue.contains("Humidity"));
        }
    }
}
