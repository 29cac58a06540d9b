use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use super::{AppState, AuthUser};
use crate::db::Store;
use crate::models::{HangoutView, NewHangout};
use crate::services::{EngineError, Response};

pub async fn list_hangouts<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<HangoutView>>, EngineError> {
    let hangouts = state.engine.list_hangouts(caller).await?;
    Ok(Json(hangouts))
}

pub async fn create_hangout<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Json(new_hangout): Json<NewHangout>,
) -> Result<(StatusCode, Json<HangoutView>), EngineError> {
    let hangout = state.engine.create_hangout(caller, new_hangout).await?;
    Ok((StatusCode::CREATED, Json(hangout)))
}

pub async fn get_hangout<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Path(hangout_id): Path<Uuid>,
) -> Result<Json<HangoutView>, EngineError> {
    let hangout = state.engine.get_hangout(caller, hangout_id).await?;
    Ok(Json(hangout))
}

pub async fn cancel_hangout<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Path(hangout_id): Path<Uuid>,
) -> Result<StatusCode, EngineError> {
    state.engine.cancel_hangout(caller, hangout_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn accept_hangout<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Path(hangout_id): Path<Uuid>,
) -> Result<Json<HangoutView>, EngineError> {
    let hangout = state.engine.respond(caller, hangout_id, Response::Accept).await?;
    Ok(Json(hangout))
}

pub async fn reject_hangout<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Path(hangout_id): Path<Uuid>,
) -> Result<Json<HangoutView>, EngineError> {
    let hangout = state.engine.respond(caller, hangout_id, Response::Reject).await?;
    Ok(Json(hangout))
}
