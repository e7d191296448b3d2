//! Booking input validation
//!
//! Violations are reported one at a time, in a fixed priority order:
//! farmerName, phone, village, crop, qtyKg, expectedPrice, hubId,
//! storageDays.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::DomainError;

/// Booking request as it arrives over the wire
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotInput {
    pub farmer_name: Option<String>,
    pub phone: Option<String>,
    pub village: Option<String>,
    pub crop: Option<String>,
    pub qty_kg: Option<Value>,
    pub expected_price: Option<Value>,
    pub hub_id: Option<String>,
    pub storage_days: Option<Value>,
}

/// A booking that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBooking {
    pub farmer_name: String,
    pub phone: String,
    pub village: String,
    pub crop: String,
    pub qty_kg: Decimal,
    pub expected_price: Decimal,
    pub hub_id: Uuid,
    pub storage_days: i32,
}

fn required_text(field: &str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(DomainError::validation(
            field,
            format!("{field} is required"),
        )),
    }
}

fn positive_number(field: &str, value: Option<Value>) -> Result<Decimal, DomainError> {
    let err = || DomainError::validation(field, format!("{field} must be a positive number"));

    let number = match value {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().map_err(|_| err())?,
        _ => return Err(err()),
    };
    if number <= Decimal::ZERO {
        return Err(err());
    }
    Ok(number)
}

/// Validate a booking request, reporting the first violation found.
pub fn validate_booking(input: CreateLotInput) -> Result<ValidatedBooking, DomainError> {
    let farmer_name = required_text("farmerName", input.farmer_name)?;
    let phone = required_text("phone", input.phone)?;
    let village = required_text("village", input.village)?;
    let crop = required_text("crop", input.crop)?;
    let qty_kg = positive_number("qtyKg", input.qty_kg)?;
    let expected_price = positive_number("expectedPrice", input.expected_price)?;

    let hub_id = match input.hub_id {
        Some(raw) if !raw.trim().is_empty() => Uuid::parse_str(raw.trim()).map_err(|_| {
            DomainError::validation("hubId", "hubId must be a valid hub identifier")
        })?,
        _ => return Err(DomainError::validation("hubId", "hubId is required")),
    };

    let storage_days = match input.storage_days {
        Some(Value::Number(n)) => n.as_i64(),
        _ => None,
    }
    .filter(|d| (1..=7).contains(d))
    .ok_or_else(|| DomainError::validation("storageDays", "storageDays must be between 1 and 7"))?
        as i32;

    Ok(ValidatedBooking {
        farmer_name,
        phone,
        village,
        crop,
        qty_kg,
        expected_price,
        hub_id,
        storage_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn full_input() -> CreateLotInput {
        CreateLotInput {
            farmer_name: Some("Ravi Kumar".to_string()),
            phone: Some("9876543210".to_string()),
            village: Some("Thoraipakkam".to_string()),
            crop: Some("Tomato".to_string()),
            qty_kg: Some(json!(100)),
            expected_price: Some(json!(20)),
            hub_id: Some(Uuid::new_v4().to_string()),
            storage_days: Some(json!(4)),
        }
    }

    fn violated_field(input: CreateLotInput) -> String {
        match validate_booking(input).unwrap_err() {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn complete_booking_passes() {
        let booking = validate_booking(full_input()).unwrap();
        assert_eq!(booking.qty_kg, dec!(100));
        assert_eq!(booking.expected_price, dec!(20));
        assert_eq!(booking.storage_days, 4);
    }

    #[test]
    fn first_violation_wins_in_priority_order() {
        // Everything wrong: farmerName is reported first.
        let empty = CreateLotInput::default();
        assert_eq!(violated_field(empty), "farmerName");

        // farmerName fine, phone missing: phone is next.
        let mut input = CreateLotInput::default();
        input.farmer_name = Some("Ravi".to_string());
        assert_eq!(violated_field(input), "phone");
    }

    #[test]
    fn each_field_is_checked() {
        for (field, mutate) in [
            ("farmerName", Box::new(|i: &mut CreateLotInput| i.farmer_name = None) as Box<dyn Fn(&mut CreateLotInput)>),
            ("phone", Box::new(|i| i.phone = Some("  ".to_string()))),
            ("village", Box::new(|i| i.village = None)),
            ("crop", Box::new(|i| i.crop = None)),
            ("qtyKg", Box::new(|i| i.qty_kg = Some(json!(0)))),
            ("expectedPrice", Box::new(|i| i.expected_price = Some(json!("cheap")))),
            ("hubId", Box::new(|i| i.hub_id = Some("not-a-uuid".to_string()))),
            ("storageDays", Box::new(|i| i.storage_days = Some(json!(8)))),
        ] {
            let mut input = full_input();
            mutate(&mut input);
            assert_eq!(violated_field(input), field);
        }
    }

    #[test]
    fn storage_days_bounds_are_inclusive() {
        for days in [1, 7] {
            let mut input = full_input();
            input.storage_days = Some(json!(days));
            assert!(validate_booking(input).is_ok());
        }
        for days in [0, 8, -1] {
            let mut input = full_input();
            input.storage_days = Some(json!(days));
            assert!(validate_booking(input).is_err());
        }
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut input = full_input();
        input.qty_kg = Some(json!(-10));
        assert_eq!(violated_field(input), "qtyKg");
    }
}
