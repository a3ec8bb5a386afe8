//! Monthly fuel price and tax tables.
//!
//! Regulatory calibration data for 2024: one table per operation kind, each
//! holding twelve month entries with a per-fuel price (currency per litre) and
//! a tax percentage. The purchase and sale tables carry slightly different
//! numbers per month; they are kept verbatim and must not be unified.
//!
//! The tables are compiled-in constants. Lookup is by exact month match: a
//! month without an entry is an error, never a fallback to a neighbour or a
//! default rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Calendar year the tables are calibrated for.
pub const RATE_YEAR: i32 = 2024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelKind {
    Gasoline,
    Ethanol,
    Diesel,
}

impl FuelKind {
    pub const ALL: [FuelKind; 3] = [Self::Gasoline, Self::Ethanol, Self::Diesel];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gasoline => "gasoline",
            Self::Ethanol => "ethanol",
            Self::Diesel => "diesel",
        }
    }
}

impl TryFrom<&str> for FuelKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "gasoline" => Ok(Self::Gasoline),
            "ethanol" => Ok(Self::Ethanol),
            "diesel" => Ok(Self::Diesel),
            other => Err(EngineError::InvalidInput(format!(
                "invalid fuel kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Purchase,
    Sale,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale => "sale",
        }
    }
}

impl TryFrom<&str> for OperationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "purchase" => Ok(Self::Purchase),
            "sale" => Ok(Self::Sale),
            other => Err(EngineError::InvalidInput(format!(
                "invalid operation kind: {other}"
            ))),
        }
    }
}

/// One month of calibration data: a price per fuel kind plus the tax rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthlyRates {
    pub gasoline: Decimal,
    pub ethanol: Decimal,
    pub diesel: Decimal,
    /// Tax percentage points applied on top of the unit price.
    pub tax_rate_percent: Decimal,
}

impl MonthlyRates {
    /// Unit price for the given fuel.
    #[must_use]
    pub fn price(&self, fuel: FuelKind) -> Decimal {
        match fuel {
            FuelKind::Gasoline => self.gasoline,
            FuelKind::Ethanol => self.ethanol,
            FuelKind::Diesel => self.diesel,
        }
    }
}

const fn rates(
    gasoline: Decimal,
    ethanol: Decimal,
    diesel: Decimal,
    tax_rate_percent: Decimal,
) -> MonthlyRates {
    MonthlyRates {
        gasoline,
        ethanol,
        diesel,
        tax_rate_percent,
    }
}

/// Prices for purchase operations, January through December.
const PURCHASE_RATES: [MonthlyRates; 12] = [
    rates(dec!(5.92), dec!(3.38), dec!(5.87), dec!(17.20)),
    rates(dec!(5.95), dec!(3.53), dec!(5.88), dec!(19.30)),
    rates(dec!(5.90), dec!(3.56), dec!(5.84), dec!(18.10)),
    rates(dec!(5.94), dec!(3.63), dec!(5.85), dec!(19.20)),
    rates(dec!(5.93), dec!(3.82), dec!(5.86), dec!(19.70)),
    rates(dec!(5.90), dec!(3.81), dec!(5.83), dec!(20.10)),
    rates(dec!(5.89), dec!(4.09), dec!(5.93), dec!(20.60)),
    rates(dec!(5.99), dec!(4.06), dec!(5.93), dec!(21.10)),
    rates(dec!(6.04), dec!(4.07), dec!(5.91), dec!(21.60)),
    rates(dec!(6.01), dec!(4.03), dec!(5.92), dec!(22.10)),
    rates(dec!(6.03), dec!(4.02), dec!(5.96), dec!(22.60)),
    rates(dec!(6.08), dec!(4.10), dec!(6.01), dec!(23.10)),
];

/// Prices for sale operations, January through December.
const SALE_RATES: [MonthlyRates; 12] = [
    rates(dec!(5.94), dec!(3.40), dec!(5.88), dec!(17.00)),
    rates(dec!(5.97), dec!(3.55), dec!(5.90), dec!(19.00)),
    rates(dec!(5.92), dec!(3.58), dec!(5.86), dec!(18.00)),
    rates(dec!(5.96), dec!(3.65), dec!(5.87), dec!(19.00)),
    rates(dec!(5.95), dec!(3.84), dec!(5.88), dec!(19.50)),
    rates(dec!(5.92), dec!(3.83), dec!(5.85), dec!(20.00)),
    rates(dec!(5.91), dec!(4.11), dec!(5.95), dec!(20.50)),
    rates(dec!(6.01), dec!(4.08), dec!(5.95), dec!(21.00)),
    rates(dec!(6.06), dec!(4.09), dec!(5.93), dec!(21.50)),
    rates(dec!(6.03), dec!(4.05), dec!(5.94), dec!(22.00)),
    rates(dec!(6.05), dec!(4.04), dec!(5.98), dec!(22.50)),
    rates(dec!(6.10), dec!(4.12), dec!(6.03), dec!(23.00)),
];

/// Returns the rates for `month` (1-12) in the table for `kind`.
///
/// Fails with [`EngineError::KeyNotFound`] when the month has no entry.
pub fn lookup(kind: OperationKind, month: u32) -> Result<&'static MonthlyRates, EngineError> {
    let table = match kind {
        OperationKind::Purchase => &PURCHASE_RATES,
        OperationKind::Sale => &SALE_RATES,
    };
    if !(1..=12).contains(&month) {
        return Err(EngineError::KeyNotFound(format!(
            "no rates for month {month}"
        )));
    }
    Ok(&table[(month - 1) as usize])
}
