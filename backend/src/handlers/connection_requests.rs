use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, AuthUser};
use crate::db::Store;
use crate::models::{ConnectionRequestView, Decision};
use crate::services::EngineError;

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub decision: Decision,
}

/// Requests waiting on the caller's approval.
pub async fn list_pending_requests<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<ConnectionRequestView>>, EngineError> {
    let requests = state.engine.list_pending_requests(caller).await?;
    Ok(Json(requests))
}

pub async fn resolve_request<S: Store + 'static>(
    State(state): State<AppState<S>>,
    AuthUser(caller): AuthUser,
    Path(request_id): Path<Uuid>,
    Json(req): Json<ResolveRequest>,
) -> Result<StatusCode, EngineError> {
    state.engine.resolve_request(caller, request_id, req.decision).await?;
    Ok(StatusCode::NO_CONTENT)
}
