use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::db::Store;
use crate::services::HangoutEngine;

pub mod auth;
pub mod connection_requests;
pub mod error;
pub mod hangouts;
pub mod users;

pub use auth::AuthUser;

/// Shared state for every route.
pub struct AppState<S> {
    pub engine: Arc<HangoutEngine<S>>,
}

impl<S> AppState<S> {
    pub fn new(engine: HangoutEngine<S>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

pub fn create_router<S: Store + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Users
        .route("/api/users", get(users::list_users::<S>))
        .route("/api/users/{id}", put(users::update_profile::<S>))
        // Hangouts
        .route(
            "/api/hangouts",
            get(hangouts::list_hangouts::<S>).post(hangouts::create_hangout::<S>),
        )
        .route(
            "/api/hangouts/{id}",
            get(hangouts::get_hangout::<S>).delete(hangouts::cancel_hangout::<S>),
        )
        .route("/api/hangouts/{id}/accept", put(hangouts::accept_hangout::<S>))
        .route("/api/hangouts/{id}/reject", put(hangouts::reject_hangout::<S>))
        // Connection requests
        .route(
            "/api/connection-requests",
            get(connection_requests::list_pending_requests::<S>),
        )
        .route(
            "/api/connection-requests/{id}",
            put(connection_requests::resolve_request::<S>),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
