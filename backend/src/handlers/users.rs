use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use super::{AppState, AuthUser};
use crate::db::Store;
use crate::models::{ProfileUpdate, User};
use crate::services::EngineError;

pub async fn list_users<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(_caller): AuthUser,
) -> Result<Json<Vec<User>>, EngineError> {
    let users = state.engine.list_users().await?;
    Ok(Json(users))
}

pub async fn update_profile<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Path(user_id): Path<Uuid>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, EngineError> {
    let user = state.engine.update_profile(caller, user_id, update).await?;
    Ok(Json(user))
}
