//! Operation valuation.
//!
//! Computes the priced fields of an operation from the monthly rate tables:
//!
//! ```text
//! total = quantity * unit_price * (1 + tax/100) * (1 + interest/100)
//! ```
//!
//! rounded to 2 decimals, half away from zero. Pure function of its inputs
//! plus the static tables: no caching, no hidden state.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::money::round_cents;
use crate::rates::{self, FuelKind, OperationKind};
use crate::{EngineError, ResultEngine};

/// Default annual interest rate percentage applied on top of the taxed price.
pub const DEFAULT_INTEREST_RATE_PERCENT: Decimal = dec!(11.5);

const PERCENT: Decimal = dec!(100);

/// Priced fields computed for an operation, ready to be merged into the
/// record before it is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Valuation {
    pub unit_price: Decimal,
    pub tax_rate_percent: Decimal,
    /// Rounded to currency minor-unit precision.
    pub total_value: Decimal,
}

/// Values an operation of `quantity` litres of `fuel` in `month` (1-12).
///
/// Fails with [`EngineError::InvalidInput`] when `quantity <= 0` and with
/// [`EngineError::KeyNotFound`] when the month has no rate entry.
pub fn valuate(
    quantity: Decimal,
    fuel: FuelKind,
    month: u32,
    kind: OperationKind,
    interest_rate_percent: Decimal,
) -> ResultEngine<Valuation> {
    if quantity <= Decimal::ZERO {
        return Err(EngineError::InvalidInput(
            "quantity must be > 0".to_string(),
        ));
    }

    let rates = rates::lookup(kind, month)?;
    let unit_price = rates.price(fuel);
    let tax_rate_percent = rates.tax_rate_percent;

    let raw = quantity
        * unit_price
        * (Decimal::ONE + tax_rate_percent / PERCENT)
        * (Decimal::ONE + interest_rate_percent / PERCENT);

    Ok(Valuation {
        unit_price,
        tax_rate_percent,
        total_value: round_cents(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_january_gasoline_purchase() {
        // 50 * 5.92 * 1.172 * 1.115 = 386.80688 -> 386.81
        let valuation = valuate(
            dec!(50),
            FuelKind::Gasoline,
            1,
            OperationKind::Purchase,
            DEFAULT_INTEREST_RATE_PERCENT,
        )
        .unwrap();
        assert_eq!(valuation.unit_price, dec!(5.92));
        assert_eq!(valuation.tax_rate_percent, dec!(17.20));
        assert_eq!(valuation.total_value, dec!(386.81));
    }

    #[test]
    fn is_idempotent() {
        let a = valuate(
            dec!(123.45),
            FuelKind::Ethanol,
            7,
            OperationKind::Sale,
            DEFAULT_INTEREST_RATE_PERCENT,
        )
        .unwrap();
        let b = valuate(
            dec!(123.45),
            FuelKind::Ethanol,
            7,
            OperationKind::Sale,
            DEFAULT_INTEREST_RATE_PERCENT,
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn total_grows_with_quantity() {
        let mut previous = Decimal::ZERO;
        for quantity in [dec!(0.5), dec!(1), dec!(10), dec!(99.9), dec!(1000)] {
            let valuation = valuate(
                quantity,
                FuelKind::Diesel,
                3,
                OperationKind::Purchase,
                DEFAULT_INTEREST_RATE_PERCENT,
            )
            .unwrap();
            assert!(valuation.total_value > previous);
            previous = valuation.total_value;
        }
    }

    #[test]
    fn rejects_non_positive_quantity() {
        for quantity in [dec!(0), dec!(-5)] {
            assert!(matches!(
                valuate(
                    quantity,
                    FuelKind::Gasoline,
                    1,
                    OperationKind::Purchase,
                    DEFAULT_INTEREST_RATE_PERCENT,
                ),
                Err(EngineError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn propagates_missing_month() {
        assert!(matches!(
            valuate(
                dec!(10),
                FuelKind::Gasoline,
                13,
                OperationKind::Sale,
                DEFAULT_INTEREST_RATE_PERCENT,
            ),
            Err(EngineError::KeyNotFound(_))
        ));
    }

    #[test]
    fn interest_rate_is_per_call() {
        let zero = valuate(dec!(10), FuelKind::Gasoline, 1, OperationKind::Sale, dec!(0)).unwrap();
        let high = valuate(dec!(10), FuelKind::Gasoline, 1, OperationKind::Sale, dec!(50)).unwrap();
        assert!(high.total_value > zero.total_value);
        // 10 * 5.94 * 1.17 = 69.498 -> 69.50
        assert_eq!(zero.total_value, dec!(69.50));
    }
}
