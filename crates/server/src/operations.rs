//! Operations API endpoints

use api_types::operation::{
    OperationFilters, OperationListResponse, OperationNew, OperationUpdate, OperationView,
    PaginationView,
};
use api_types::{FuelKind as ApiFuel, OperationKind as ApiKind};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn kind_to_engine(kind: ApiKind) -> engine::OperationKind {
    match kind {
        ApiKind::Purchase => engine::OperationKind::Purchase,
        ApiKind::Sale => engine::OperationKind::Sale,
    }
}

pub(crate) fn kind_from_engine(kind: engine::OperationKind) -> ApiKind {
    match kind {
        engine::OperationKind::Purchase => ApiKind::Purchase,
        engine::OperationKind::Sale => ApiKind::Sale,
    }
}

pub(crate) fn fuel_to_engine(fuel: ApiFuel) -> engine::FuelKind {
    match fuel {
        ApiFuel::Gasoline => engine::FuelKind::Gasoline,
        ApiFuel::Ethanol => engine::FuelKind::Ethanol,
        ApiFuel::Diesel => engine::FuelKind::Diesel,
    }
}

pub(crate) fn fuel_from_engine(fuel: engine::FuelKind) -> ApiFuel {
    match fuel {
        engine::FuelKind::Gasoline => ApiFuel::Gasoline,
        engine::FuelKind::Ethanol => ApiFuel::Ethanol,
        engine::FuelKind::Diesel => ApiFuel::Diesel,
    }
}

pub(crate) fn filter_from_query(filters: &OperationFilters) -> engine::OperationFilter {
    engine::OperationFilter {
        kind: filters.kind.map(kind_to_engine),
        fuel: filters.fuel.map(fuel_to_engine),
        from: filters.start_date.map(|dt| dt.with_timezone(&Utc)),
        to: filters.end_date.map(|dt| dt.with_timezone(&Utc)),
    }
}

fn view(op: engine::Operation) -> OperationView {
    OperationView {
        id: op.id,
        kind: kind_from_engine(op.kind),
        fuel: fuel_from_engine(op.fuel),
        quantity: op.quantity,
        unit_price: op.unit_price,
        tax_rate_percent: op.tax_rate_percent,
        total_value: op.total_value,
        date: op.occurred_at.fixed_offset(),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<OperationNew>,
) -> Result<(StatusCode, Json<OperationView>), ServerError> {
    let op = state
        .engine
        .create_operation(
            &user.id,
            engine::OperationNewCmd {
                kind: kind_to_engine(payload.kind),
                fuel: fuel_to_engine(payload.fuel),
                quantity: payload.quantity,
                occurred_at: payload.date.with_timezone(&Utc),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(op))))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(filters): Query<OperationFilters>,
) -> Result<Json<OperationListResponse>, ServerError> {
    let (ops, page) = state
        .engine
        .list_operations(
            &user.id,
            &filter_from_query(&filters),
            engine::PageRequest {
                page: filters.page,
                limit: filters.limit,
            },
        )
        .await?;

    Ok(Json(OperationListResponse {
        operations: ops.into_iter().map(view).collect(),
        pagination: PaginationView {
            page: page.page,
            limit: page.limit,
            total: page.total,
            pages: page.pages,
        },
    }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationView>, ServerError> {
    let op = state.engine.operation(id, &user.id).await?;
    Ok(Json(view(op)))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OperationUpdate>,
) -> Result<Json<OperationView>, ServerError> {
    let op = state
        .engine
        .update_operation(
            id,
            &user.id,
            engine::OperationPatch {
                kind: payload.kind.map(kind_to_engine),
                fuel: payload.fuel.map(fuel_to_engine),
                quantity: payload.quantity,
                occurred_at: payload.date.map(|dt| dt.with_timezone(&Utc)),
            },
        )
        .await?;

    Ok(Json(view(op)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_operation(id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
