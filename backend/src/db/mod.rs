//! Persistence for users, hangouts and connection requests.
//!
//! The engine only talks to the [`Store`] traits. [`PgStore`] backs them with
//! PostgreSQL; [`MemoryStore`] keeps everything in process for tests and
//! local runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ConnectionRequest, Hangout, HangoutStatus, RequestStatus, User};

pub mod connection;
pub mod memory;
pub mod migrations;
pub mod postgres;
mod error;

pub use connection::{get_db_pool, DatabaseConfig};
pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Users matching `ids`, in no particular order. Unknown ids are skipped.
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;

    /// Insert or update the profile and friend list. The approved set of an
    /// existing user is left as stored; it only grows through
    /// [`UserStore::add_approved_connection`].
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Add `requested_id` to the requester's approved set if absent.
    async fn add_approved_connection(&self, requester_id: Uuid, requested_id: Uuid) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct HangoutFilter {
    /// Hangouts hosted by or inviting this user.
    pub member_id: Option<Uuid>,
    pub exclude_cancelled: bool,
}

#[async_trait]
pub trait HangoutStore: Send + Sync {
    async fn find_hangout(&self, id: Uuid) -> Result<Option<Hangout>>;

    /// Newest first.
    async fn find_hangouts(&self, filter: &HangoutFilter) -> Result<Vec<Hangout>>;

    /// Persist a new hangout together with the requests it spawned. Either
    /// both are stored or neither is.
    async fn create_hangout(&self, hangout: &Hangout, requests: &[ConnectionRequest]) -> Result<()>;

    /// Overwrite `accepted_by` and `rejected_by`. The stored status is untouched.
    async fn save_responses(&self, hangout: &Hangout) -> Result<()>;

    /// Set `to` only if the stored status is still `from`. Returns whether it did.
    async fn transition_hangout(&self, id: Uuid, from: HangoutStatus, to: HangoutStatus) -> Result<bool>;

    /// Move a `pending` or `pending_approval` hangout to `confirmed`. Returns
    /// whether it did.
    async fn confirm_hangout(&self, id: Uuid) -> Result<bool>;

    /// Cancel the hangout if its status is still `from`, rejecting its pending
    /// connection requests in the same write. Returns the number of rejected
    /// requests, or `None` when the status had moved and nothing changed.
    async fn cancel_hangout(&self, id: Uuid, from: HangoutStatus) -> Result<Option<u64>>;
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionRequestFilter {
    pub id: Option<Uuid>,
    pub hangout_id: Option<Uuid>,
    pub approver_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
}

impl ConnectionRequestFilter {
    pub fn pending_by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            status: Some(RequestStatus::Pending),
            ..Default::default()
        }
    }

    pub fn pending_for_approver(approver_id: Uuid) -> Self {
        Self {
            approver_id: Some(approver_id),
            status: Some(RequestStatus::Pending),
            ..Default::default()
        }
    }

    pub fn matches(&self, request: &ConnectionRequest) -> bool {
        self.id.is_none_or(|id| request.id == id)
            && self.hangout_id.is_none_or(|id| request.hangout_id == id)
            && self.approver_id.is_none_or(|id| request.approver_id == id)
            && self.status.is_none_or(|status| request.status == status)
    }
}

#[async_trait]
pub trait ConnectionRequestStore: Send + Sync {
    async fn find_request(&self, id: Uuid) -> Result<Option<ConnectionRequest>>;

    /// Oldest first.
    async fn find_requests(&self, filter: &ConnectionRequestFilter) -> Result<Vec<ConnectionRequest>>;

    async fn count_pending(&self, hangout_id: Uuid) -> Result<i64>;

    async fn insert_requests(&self, requests: &[ConnectionRequest]) -> Result<()>;

    /// Set `status` on every matching request. Returns how many changed.
    async fn update_request_status(&self, filter: &ConnectionRequestFilter, status: RequestStatus) -> Result<u64>;
}

/// Everything the hangout engine needs from persistence.
pub trait Store: UserStore + HangoutStore + ConnectionRequestStore {}

impl<T> Store for T where T: UserStore + HangoutStore + ConnectionRequestStore {}
