//! Fuel operation pricing & reporting engine.
//!
//! The engine owns three concerns:
//!
//! - the monthly price/tax tables ([`rates`]),
//! - the valuation of an operation from those tables ([`valuation`]),
//! - the aggregation of recorded operations into a summary ([`summary`]).
//!
//! Around that core it provides the `operations` record store (sea-orm over
//! sqlite): all writes derive the priced fields through [`valuate`] before
//! persisting, and the reporting path feeds stored records into
//! [`summarize`]. Every store method is scoped to the owning user; a record
//! id that belongs to someone else behaves exactly like a missing one.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use uuid::Uuid;

pub use error::EngineError;
pub use money::round_cents;
pub use operations::{
    MAX_QUANTITY_LITRES, Operation, OperationFilter, OperationNewCmd, OperationPatch, PageInfo,
    PageRequest,
};
pub use rates::{FuelKind, MonthlyRates, OperationKind, RATE_YEAR, lookup};
pub use summary::{FuelTotals, ResultClass, Summary, summarize};
pub use valuation::{DEFAULT_INTEREST_RATE_PERCENT, Valuation, valuate};

mod error;
mod money;
pub mod operations;
mod rates;
mod summary;
mod valuation;

type ResultEngine<T> = Result<T, EngineError>;

#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Creates an operation for `user_id`.
    ///
    /// The month is derived from `occurred_at` and the priced fields are
    /// computed with the default interest rate before the record is stored.
    pub async fn create_operation(
        &self,
        user_id: &str,
        cmd: OperationNewCmd,
    ) -> ResultEngine<Operation> {
        validate_write(cmd.quantity, cmd.occurred_at)?;
        let valuation = valuate(
            cmd.quantity,
            cmd.fuel,
            cmd.occurred_at.month(),
            cmd.kind,
            DEFAULT_INTEREST_RATE_PERCENT,
        )?;

        let op = Operation {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind: cmd.kind,
            fuel: cmd.fuel,
            quantity: cmd.quantity,
            unit_price: valuation.unit_price,
            tax_rate_percent: valuation.tax_rate_percent,
            total_value: valuation.total_value,
            occurred_at: cmd.occurred_at,
        };
        operations::ActiveModel::from(&op)
            .insert(&self.database)
            .await?;
        Ok(op)
    }

    /// Returns a single operation owned by `user_id`.
    pub async fn operation(&self, operation_id: Uuid, user_id: &str) -> ResultEngine<Operation> {
        let model = self.operation_model(operation_id, user_id).await?;
        Operation::try_from(model)
    }

    /// Lists operations newest-first with the given filter and pagination.
    pub async fn list_operations(
        &self,
        user_id: &str,
        filter: &OperationFilter,
        page: PageRequest,
    ) -> ResultEngine<(Vec<Operation>, PageInfo)> {
        let (page, limit) = page.normalize()?;

        let paginator = filtered(user_id, filter)
            .order_by_desc(operations::Column::OccurredAt)
            .paginate(&self.database, limit);
        let counts = paginator.num_items_and_pages().await?;
        let models = paginator.fetch_page(page - 1).await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Operation::try_from(model)?);
        }

        Ok((
            out,
            PageInfo {
                page,
                limit,
                total: counts.number_of_items,
                pages: counts.number_of_pages,
            },
        ))
    }

    /// Applies a partial update to an operation.
    ///
    /// Fields absent from `patch` default to the stored values; whenever any
    /// of quantity/fuel/kind/date changes, the month is re-derived and the
    /// valuation recomputed from the merged record.
    pub async fn update_operation(
        &self,
        operation_id: Uuid,
        user_id: &str,
        patch: OperationPatch,
    ) -> ResultEngine<Operation> {
        let model = self.operation_model(operation_id, user_id).await?;
        let mut op = Operation::try_from(model)?;

        if patch.is_empty() {
            return Ok(op);
        }

        op.kind = patch.kind.unwrap_or(op.kind);
        op.fuel = patch.fuel.unwrap_or(op.fuel);
        op.quantity = patch.quantity.unwrap_or(op.quantity);
        op.occurred_at = patch.occurred_at.unwrap_or(op.occurred_at);

        validate_write(op.quantity, op.occurred_at)?;
        let valuation = valuate(
            op.quantity,
            op.fuel,
            op.occurred_at.month(),
            op.kind,
            DEFAULT_INTEREST_RATE_PERCENT,
        )?;
        op.unit_price = valuation.unit_price;
        op.tax_rate_percent = valuation.tax_rate_percent;
        op.total_value = valuation.total_value;

        operations::ActiveModel::from(&op)
            .update(&self.database)
            .await?;
        Ok(op)
    }

    /// Deletes an operation owned by `user_id`.
    pub async fn delete_operation(&self, operation_id: Uuid, user_id: &str) -> ResultEngine<()> {
        let model = self.operation_model(operation_id, user_id).await?;
        operations::Entity::delete_by_id(model.id)
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Builds the profit/loss summary over the operations matching `filter`.
    ///
    /// The whole matching set is loaded (no pagination) and reduced with
    /// [`summarize`]; a corrupt stored record aborts the request.
    pub async fn summary(&self, user_id: &str, filter: &OperationFilter) -> ResultEngine<Summary> {
        let models = filtered(user_id, filter).all(&self.database).await?;
        let mut ops = Vec::with_capacity(models.len());
        for model in models {
            ops.push(Operation::try_from(model)?);
        }
        Ok(summarize(&ops))
    }

    /// Number of operations recorded by `user_id`, unfiltered.
    pub async fn operation_count(&self, user_id: &str) -> ResultEngine<u64> {
        let count = operations::Entity::find()
            .filter(operations::Column::UserId.eq(user_id))
            .count(&self.database)
            .await?;
        Ok(count)
    }

    async fn operation_model(
        &self,
        operation_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<operations::Model> {
        let model = operations::Entity::find_by_id(operation_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("operation not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::KeyNotFound("operation not exists".to_string()));
        }
        Ok(model)
    }
}

fn filtered(user_id: &str, filter: &OperationFilter) -> Select<operations::Entity> {
    let mut query =
        operations::Entity::find().filter(operations::Column::UserId.eq(user_id));
    if let Some(kind) = filter.kind {
        query = query.filter(operations::Column::Kind.eq(kind.as_str()));
    }
    if let Some(fuel) = filter.fuel {
        query = query.filter(operations::Column::Fuel.eq(fuel.as_str()));
    }
    if let Some(from) = filter.from {
        query = query.filter(operations::Column::OccurredAt.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(operations::Column::OccurredAt.lte(to));
    }
    query
}

fn validate_write(quantity: Decimal, occurred_at: DateTime<Utc>) -> ResultEngine<()> {
    if quantity > MAX_QUANTITY_LITRES {
        return Err(EngineError::InvalidInput(format!(
            "quantity exceeds {MAX_QUANTITY_LITRES} litres"
        )));
    }
    if occurred_at.year() != RATE_YEAR {
        return Err(EngineError::InvalidInput(format!(
            "date must fall in {RATE_YEAR}, the rate-table year"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
