//! Report aggregation.
//!
//! Pure reduction over an already-filtered set of operations: totals per
//! operation kind, a per-fuel breakdown and a profit/loss classification.
//! The classification is made on the difference rounded to 2 decimals, so an
//! exact 0.00 is always `Breakeven`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::round_cents;
use crate::operations::Operation;
use crate::rates::{FuelKind, OperationKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultClass {
    Profit,
    Loss,
    Breakeven,
}

impl ResultClass {
    fn from_difference(difference: Decimal) -> Self {
        if difference > Decimal::ZERO {
            Self::Profit
        } else if difference < Decimal::ZERO {
            Self::Loss
        } else {
            Self::Breakeven
        }
    }
}

/// Purchase/sale totals for a single fuel kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelTotals {
    pub fuel: FuelKind,
    pub purchases: Decimal,
    pub sales: Decimal,
    pub difference: Decimal,
}

/// Aggregate view over a set of operations. Recomputed on every request,
/// never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_purchases: Decimal,
    pub total_sales: Decimal,
    /// `total_sales - total_purchases`, rounded.
    pub difference: Decimal,
    pub result: ResultClass,
    /// One entry per fuel kind that appears in the input, in first-appearance
    /// order. Fuels with no records are omitted.
    pub per_fuel: Vec<FuelTotals>,
    pub operation_count: u64,
}

/// Reduces `operations` into a [`Summary`].
///
/// The input is treated as read-only; filtering and pagination happen before
/// this call. Empty input yields zero totals and `Breakeven`.
#[must_use]
pub fn summarize(operations: &[Operation]) -> Summary {
    let mut total_purchases = Decimal::ZERO;
    let mut total_sales = Decimal::ZERO;
    // At most three fuels; a scan over a Vec keeps first-appearance order.
    let mut per_fuel: Vec<(FuelKind, Decimal, Decimal)> = Vec::new();

    for op in operations {
        let index = match per_fuel.iter().position(|(fuel, _, _)| *fuel == op.fuel) {
            Some(index) => index,
            None => {
                per_fuel.push((op.fuel, Decimal::ZERO, Decimal::ZERO));
                per_fuel.len() - 1
            }
        };
        let group = &mut per_fuel[index];
        match op.kind {
            OperationKind::Purchase => {
                total_purchases += op.total_value;
                group.1 += op.total_value;
            }
            OperationKind::Sale => {
                total_sales += op.total_value;
                group.2 += op.total_value;
            }
        }
    }

    let difference = round_cents(total_sales - total_purchases);

    Summary {
        total_purchases: round_cents(total_purchases),
        total_sales: round_cents(total_sales),
        difference,
        result: ResultClass::from_difference(difference),
        per_fuel: per_fuel
            .into_iter()
            .map(|(fuel, purchases, sales)| FuelTotals {
                fuel,
                purchases: round_cents(purchases),
                sales: round_cents(sales),
                difference: round_cents(sales - purchases),
            })
            .collect(),
        operation_count: operations.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn op(kind: OperationKind, fuel: FuelKind, total_value: Decimal) -> Operation {
        Operation {
            id: Uuid::new_v4(),
            user_id: "user".to_string(),
            kind,
            fuel,
            quantity: dec!(1),
            unit_price: dec!(1),
            tax_rate_percent: dec!(0),
            total_value,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_is_breakeven() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_purchases, Decimal::ZERO);
        assert_eq!(summary.total_sales, Decimal::ZERO);
        assert_eq!(summary.difference, Decimal::ZERO);
        assert_eq!(summary.result, ResultClass::Breakeven);
        assert!(summary.per_fuel.is_empty());
        assert_eq!(summary.operation_count, 0);
    }

    #[test]
    fn single_fuel_profit() {
        let ops = [
            op(OperationKind::Purchase, FuelKind::Gasoline, dec!(100.00)),
            op(OperationKind::Sale, FuelKind::Gasoline, dec!(150.00)),
        ];
        let summary = summarize(&ops);
        assert_eq!(summary.total_purchases, dec!(100.00));
        assert_eq!(summary.total_sales, dec!(150.00));
        assert_eq!(summary.difference, dec!(50.00));
        assert_eq!(summary.result, ResultClass::Profit);
        assert_eq!(summary.operation_count, 2);
        assert_eq!(summary.per_fuel.len(), 1);
        assert_eq!(summary.per_fuel[0].fuel, FuelKind::Gasoline);
        assert_eq!(summary.per_fuel[0].difference, dec!(50.00));
    }

    #[test]
    fn loss_and_breakeven_classification() {
        let loss = summarize(&[
            op(OperationKind::Purchase, FuelKind::Diesel, dec!(10.00)),
            op(OperationKind::Sale, FuelKind::Diesel, dec!(9.99)),
        ]);
        assert_eq!(loss.result, ResultClass::Loss);

        let even = summarize(&[
            op(OperationKind::Purchase, FuelKind::Diesel, dec!(10.00)),
            op(OperationKind::Sale, FuelKind::Diesel, dec!(10.00)),
        ]);
        assert_eq!(even.result, ResultClass::Breakeven);
        assert_eq!(even.difference, dec!(0.00));
    }

    #[test]
    fn per_fuel_keeps_first_appearance_order_and_omits_absent_fuels() {
        let ops = [
            op(OperationKind::Sale, FuelKind::Diesel, dec!(20.00)),
            op(OperationKind::Purchase, FuelKind::Gasoline, dec!(5.00)),
            op(OperationKind::Sale, FuelKind::Diesel, dec!(1.00)),
        ];
        let summary = summarize(&ops);
        let fuels: Vec<FuelKind> = summary.per_fuel.iter().map(|f| f.fuel).collect();
        assert_eq!(fuels, vec![FuelKind::Diesel, FuelKind::Gasoline]);
    }

    #[test]
    fn per_fuel_differences_add_up_to_total_difference() {
        let ops = [
            op(OperationKind::Purchase, FuelKind::Gasoline, dec!(123.45)),
            op(OperationKind::Sale, FuelKind::Gasoline, dec!(200.10)),
            op(OperationKind::Purchase, FuelKind::Ethanol, dec!(55.55)),
            op(OperationKind::Sale, FuelKind::Diesel, dec!(77.31)),
            op(OperationKind::Purchase, FuelKind::Diesel, dec!(80.00)),
        ];
        let summary = summarize(&ops);
        let per_fuel_sum: Decimal = summary.per_fuel.iter().map(|f| f.difference).sum();
        assert_eq!(per_fuel_sum, summary.difference);
    }
}
