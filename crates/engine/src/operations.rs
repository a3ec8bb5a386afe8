//! Operation records.
//!
//! An `Operation` is a single recorded fuel purchase or sale. The priced
//! fields (`unit_price`, `tax_rate_percent`, `total_value`) are computed by
//! [`crate::valuation::valuate`] on every write; the record is otherwise
//! read-only input for reporting.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::rates::{FuelKind, OperationKind};
use crate::{EngineError, ResultEngine};

/// Upper bound on a single operation's quantity, in litres.
pub const MAX_QUANTITY_LITRES: Decimal = dec!(100000);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    pub user_id: String,
    pub kind: OperationKind,
    pub fuel: FuelKind,
    /// Litres, strictly positive.
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate_percent: Decimal,
    /// Rounded to 2 decimals at valuation time.
    pub total_value: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Inputs for creating an operation. The priced fields are always derived,
/// never accepted from the caller.
#[derive(Clone, Debug)]
pub struct OperationNewCmd {
    pub kind: OperationKind,
    pub fuel: FuelKind,
    pub quantity: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Partial update. `None` keeps the stored value; if any field is set the
/// valuation is recomputed from the merged record.
#[derive(Clone, Debug, Default)]
pub struct OperationPatch {
    pub kind: Option<OperationKind>,
    pub fuel: Option<FuelKind>,
    pub quantity: Option<Decimal>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl OperationPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.fuel.is_none()
            && self.quantity.is_none()
            && self.occurred_at.is_none()
    }
}

/// Storage-level filter for lists and summaries. Pagination is separate; the
/// summary path uses the filter alone.
#[derive(Clone, Debug, Default)]
pub struct OperationFilter {
    pub kind: Option<OperationKind>,
    pub fuel: Option<FuelKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Page request as received from the client; normalized before use.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageRequest {
    /// Returns `(page, limit)` with the defaults applied (page 1, limit 10).
    ///
    /// Explicit values outside `page >= 1` or `1 <= limit <= 100` are
    /// rejected rather than clamped.
    pub(crate) fn normalize(self) -> ResultEngine<(u64, u64)> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(EngineError::InvalidInput("page must be >= 1".to_string()));
        }
        let limit = self.limit.unwrap_or(10);
        if !(1..=100).contains(&limit) {
            return Err(EngineError::InvalidInput(
                "limit must be between 1 and 100".to_string(),
            ));
        }
        Ok((page, limit))
    }
}

/// Pagination metadata returned alongside a page of operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub fuel: String,
    // Decimal columns are stored as text: sqlite has no exact numeric type
    // and the engine must not round-trip money through floats.
    pub quantity: String,
    pub unit_price: String,
    pub tax_rate_percent: String,
    pub total_value: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Operation> for ActiveModel {
    fn from(op: &Operation) -> Self {
        Self {
            id: ActiveValue::Set(op.id.to_string()),
            user_id: ActiveValue::Set(op.user_id.clone()),
            kind: ActiveValue::Set(op.kind.as_str().to_string()),
            fuel: ActiveValue::Set(op.fuel.as_str().to_string()),
            quantity: ActiveValue::Set(op.quantity.to_string()),
            unit_price: ActiveValue::Set(op.unit_price.to_string()),
            tax_rate_percent: ActiveValue::Set(op.tax_rate_percent.to_string()),
            total_value: ActiveValue::Set(op.total_value.to_string()),
            occurred_at: ActiveValue::Set(op.occurred_at),
        }
    }
}

fn parse_decimal(field: &str, value: &str) -> ResultEngine<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| EngineError::InvalidInput(format!("invalid {field}: {value}")))
}

impl TryFrom<Model> for Operation {
    type Error = EngineError;

    /// A stored row with an unknown kind/fuel or a malformed decimal is an
    /// upstream contract violation and fails loudly instead of being skipped.
    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("operation not exists".to_string()))?,
            user_id: model.user_id,
            kind: OperationKind::try_from(model.kind.as_str())?,
            fuel: FuelKind::try_from(model.fuel.as_str())?,
            quantity: parse_decimal("quantity", &model.quantity)?,
            unit_price: parse_decimal("unit_price", &model.unit_price)?,
            tax_rate_percent: parse_decimal("tax_rate_percent", &model.tax_rate_percent)?,
            total_value: parse_decimal("total_value", &model.total_value)?,
            occurred_at: model.occurred_at,
        })
    }
}
