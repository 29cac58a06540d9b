use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{ConnectionRequest, Hangout, HangoutStatus, RequestStatus, UserSummary};

/// A hangout as the client sees it, with member summaries filled in.
#[derive(Debug, Clone, Serialize)]
pub struct HangoutView {
    pub id: Uuid,
    pub host_id: Uuid,
    pub host: UserSummary,
    pub participants: Vec<UserSummary>,
    pub unreachable_participants: Vec<UserSummary>,
    pub accepted_by: Vec<Uuid>,
    pub rejected_by: Vec<Uuid>,
    pub activity_description: String,
    pub details: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: HangoutStatus,
    /// Whether the viewing user may accept or reject right now.
    pub can_respond: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HangoutView {
    pub fn new(
        hangout: Hangout,
        host: UserSummary,
        participants: Vec<UserSummary>,
        unreachable_participants: Vec<UserSummary>,
        can_respond: bool,
    ) -> Self {
        Self {
            id: hangout.id,
            host_id: hangout.host_id,
            host,
            participants,
            unreachable_participants,
            accepted_by: hangout.accepted_by,
            rejected_by: hangout.rejected_by,
            activity_description: hangout.activity_description,
            details: hangout.details,
            scheduled_at: hangout.scheduled_at,
            status: hangout.status,
            can_respond,
            created_at: hangout.created_at,
            updated_at: hangout.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRequestView {
    pub id: Uuid,
    pub hangout_id: Uuid,
    pub requester: UserSummary,
    pub requested: UserSummary,
    pub approver_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl ConnectionRequestView {
    pub fn new(request: ConnectionRequest, requester: UserSummary, requested: UserSummary) -> Self {
        Self {
            id: request.id,
            hangout_id: request.hangout_id,
            requester,
            requested,
            approver_id: request.approver_id,
            status: request.status,
            created_at: request.created_at,
        }
    }
}
