//! The module contains the definition of a user and the account endpoints.

use api_types::user::{MeResponse, RegisterUser, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::EngineError;
use sea_orm::{ActiveValue, SqlErr, entity::prelude::*};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn validate_registration(payload: &RegisterUser) -> Result<(), ServerError> {
    if payload.name.trim().len() < 2 {
        return Err(ServerError::Generic(
            "name must be at least 2 characters".to_string(),
        ));
    }
    if !payload.email.contains('@') {
        return Err(ServerError::Generic("invalid email".to_string()));
    }
    if payload.password.len() < 6 {
        return Err(ServerError::Generic(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

/// Creates an account. The only route outside the auth middleware.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    validate_registration(&payload)?;

    let user = Model {
        id: Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        email: payload.email,
        password: payload.password,
        created_at: Utc::now(),
    };

    let active = ActiveModel {
        id: ActiveValue::Set(user.id.clone()),
        name: ActiveValue::Set(user.name.clone()),
        email: ActiveValue::Set(user.email.clone()),
        password: ActiveValue::Set(user.password.clone()),
        created_at: ActiveValue::Set(user.created_at),
    };
    // The unique email index is the single source of truth for duplicates:
    // no find-then-insert window for concurrent registrations.
    if let Err(err) = active.insert(&state.db).await {
        return Err(match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ServerError::Engine(EngineError::ExistingKey(user.email))
            }
            _ => ServerError::Engine(EngineError::from(err)),
        });
    }

    Ok((StatusCode::CREATED, Json(view(&user)?)))
}

/// Profile of the authenticated user, with their operation count.
pub async fn me(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
) -> Result<Json<MeResponse>, ServerError> {
    let operation_count = state.engine.operation_count(&user.id).await?;
    let profile = view(&user)?;

    Ok(Json(MeResponse {
        id: profile.id,
        name: profile.name,
        email: profile.email,
        created_at: profile.created_at,
        operation_count,
    }))
}

fn view(user: &Model) -> Result<UserView, ServerError> {
    Ok(UserView {
        id: Uuid::parse_str(&user.id)
            .map_err(|_| ServerError::Generic("invalid user id".to_string()))?,
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: user.created_at.fixed_offset(),
    })
}
