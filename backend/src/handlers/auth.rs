use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::constants::USER_ID_HEADER;

/// The calling user, as asserted by the upstream auth gateway.
///
/// Credentials are never checked here; the header is trusted as-is.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| unauthorized("Not authorized, no user id"))?;

        let user_id = value
            .parse::<Uuid>()
            .map_err(|_| unauthorized("Not authorized, malformed user id"))?;

        Ok(AuthUser(user_id))
    }
}

fn unauthorized(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message,
            "code": "UNAUTHENTICATED"
        })),
    )
}
