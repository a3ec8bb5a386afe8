use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire-level operation kind.
///
/// Serialized in UPPERCASE (`PURCHASE` / `SALE`), matching the values clients
/// already send for the `type` filter parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Purchase,
    Sale,
}

/// Wire-level fuel kind (`GASOLINE` / `ETHANOL` / `DIESEL`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FuelKind {
    Gasoline,
    Ethanol,
    Diesel,
}

pub mod operation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationNew {
        #[serde(rename = "type")]
        pub kind: OperationKind,
        pub fuel: FuelKind,
        /// Litres, strictly positive.
        pub quantity: Decimal,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub date: DateTime<FixedOffset>,
    }

    /// Partial update. Omitted fields keep their stored values; if any priced
    /// field changes the server recomputes the valuation.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OperationUpdate {
        #[serde(rename = "type")]
        pub kind: Option<OperationKind>,
        pub fuel: Option<FuelKind>,
        pub quantity: Option<Decimal>,
        pub date: Option<DateTime<FixedOffset>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: OperationKind,
        pub fuel: FuelKind,
        pub quantity: Decimal,
        pub unit_price: Decimal,
        pub tax_rate_percent: Decimal,
        pub total_value: Decimal,
        pub date: DateTime<FixedOffset>,
    }

    /// Query parameters shared by the list and summary endpoints.
    ///
    /// `page`/`limit` are ignored by the summary endpoint.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct OperationFilters {
        #[serde(rename = "type")]
        pub kind: Option<OperationKind>,
        pub fuel: Option<FuelKind>,
        pub start_date: Option<DateTime<FixedOffset>>,
        pub end_date: Option<DateTime<FixedOffset>>,
        pub page: Option<u64>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaginationView {
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub pages: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OperationListResponse {
        pub operations: Vec<OperationView>,
        pub pagination: PaginationView,
    }
}

pub mod report {
    use super::*;

    /// Profit/loss classification of a summary, derived from the rounded
    /// difference and never stored.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum ResultClass {
        Profit,
        Loss,
        Breakeven,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FuelTotalsView {
        pub fuel: FuelKind,
        pub purchases: Decimal,
        pub sales: Decimal,
        pub difference: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub total_purchases: Decimal,
        pub total_sales: Decimal,
        pub difference: Decimal,
        pub result: ResultClass,
        pub per_fuel: Vec<FuelTotalsView>,
        pub operation_count: u64,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeResponse {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<FixedOffset>,
        pub operation_count: u64,
    }
}
