//! Farmer settlement arithmetic
//!
//! The advance is fixed at booking time (half the estimated value). When a
//! lot enters SOLD or SETTLED the full settlement is recomputed from scratch
//! from its sold value; re-applying the same status yields the same ledger
//! row, never an accumulated one.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::Deduction;

/// Marketplace fees applied at settlement. Configurable; these defaults
/// mirror the launch fee schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fees {
    pub commission_rate: Decimal,
    pub logistics_fee: Decimal,
}

impl Default for Fees {
    fn default() -> Self {
        Self {
            commission_rate: dec!(0.07),
            logistics_fee: dec!(50),
        }
    }
}

/// Result of a settlement computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub sold_value: Decimal,
    pub deductions: Vec<Deduction>,
    pub final_amount: Decimal,
}

/// Round to whole currency units, half away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Advance paid to the farmer at booking: 50% of estimated value, rounded.
pub fn advance_for(qty_kg: Decimal, expected_price: Decimal) -> Decimal {
    round_currency(qty_kg * expected_price * dec!(0.5))
}

/// Compute the full settlement for a lot entering SOLD or SETTLED.
///
/// `advance` is read from the existing ledger record, zero when absent.
pub fn compute(qty_kg: Decimal, expected_price: Decimal, advance: Decimal, fees: &Fees) -> Settlement {
    compute_from_value(qty_kg * expected_price, advance, fees)
}

/// Settlement from an already-determined sold value.
///
/// A lot drained by orders carries no remaining quantity, so its sold value
/// is the revenue of the order lines placed against it rather than
/// `qty * price`; both paths end up here.
pub fn compute_from_value(sold_value: Decimal, advance: Decimal, fees: &Fees) -> Settlement {
    let commission = round_currency(sold_value * fees.commission_rate);

    let deductions = vec![
        Deduction {
            label: "Commission (7%)".to_string(),
            amount: commission,
        },
        Deduction {
            label: "Logistics Fee".to_string(),
            amount: fees.logistics_fee,
        },
    ];

    let total_deductions: Decimal = deductions.iter().map(|d| d.amount).sum();
    let final_amount = sold_value - total_deductions - advance;

    Settlement {
        sold_value,
        deductions,
        final_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_half_of_estimated_value_rounded() {
        assert_eq!(advance_for(dec!(100), dec!(20)), dec!(1000));
        // 15 * 21 * 0.5 = 157.5, rounds away from zero
        assert_eq!(advance_for(dec!(15), dec!(21)), dec!(158));
    }

    #[test]
    fn settlement_matches_booked_scenario() {
        // 100kg tomato at 20/kg, advance 1000
        let s = compute(dec!(100), dec!(20), dec!(1000), &Fees::default());

        assert_eq!(s.sold_value, dec!(2000));
        assert_eq!(s.deductions.len(), 2);
        assert_eq!(s.deductions[0].label, "Commission (7%)");
        assert_eq!(s.deductions[0].amount, dec!(140));
        assert_eq!(s.deductions[1].label, "Logistics Fee");
        assert_eq!(s.deductions[1].amount, dec!(50));
        assert_eq!(s.final_amount, dec!(810));
    }

    #[test]
    fn drained_lot_settles_on_order_revenue() {
        // 100kg fully sold through orders: remaining qty is zero but the
        // order lines are worth 2000, so the payout matches an operator
        // marking the same lot SOLD before any orders.
        let s = compute_from_value(dec!(2000), dec!(1000), &Fees::default());
        assert_eq!(s.final_amount, dec!(810));
    }

    #[test]
    fn settlement_is_idempotent() {
        let first = compute(dec!(250), dec!(22), dec!(2750), &Fees::default());
        let again = compute(dec!(250), dec!(22), dec!(2750), &Fees::default());
        assert_eq!(first, again);
    }

    #[test]
    fn missing_advance_defaults_to_zero() {
        let s = compute(dec!(10), dec!(30), Decimal::ZERO, &Fees::default());
        // 300 - 21 - 50 - 0
        assert_eq!(s.final_amount, dec!(229));
    }
}
