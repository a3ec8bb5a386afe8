//! Reporting API endpoints

use api_types::operation::OperationFilters;
use api_types::report::{FuelTotalsView, ResultClass as ApiResult, SummaryResponse};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, operations, server::ServerState, user};

fn result_from_engine(result: engine::ResultClass) -> ApiResult {
    match result {
        engine::ResultClass::Profit => ApiResult::Profit,
        engine::ResultClass::Loss => ApiResult::Loss,
        engine::ResultClass::Breakeven => ApiResult::Breakeven,
    }
}

/// Profit/loss summary over the operations matching the query filters.
///
/// Accepts the same filter parameters as the list endpoint; `page`/`limit`
/// are ignored because the whole matching set is aggregated.
pub async fn summary(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(filters): Query<OperationFilters>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let summary = state
        .engine
        .summary(&user.id, &operations::filter_from_query(&filters))
        .await?;

    Ok(Json(SummaryResponse {
        total_purchases: summary.total_purchases,
        total_sales: summary.total_sales,
        difference: summary.difference,
        result: result_from_engine(summary.result),
        per_fuel: summary
            .per_fuel
            .into_iter()
            .map(|totals| FuelTotalsView {
                fuel: operations::fuel_from_engine(totals.fuel),
                purchases: totals.purchases,
                sales: totals.sales,
                difference: totals.difference,
            })
            .collect(),
        operation_count: summary.operation_count,
    }))
}
