use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::UnknownStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HangoutStatus {
    /// At least one connection request is still waiting on its approver.
    PendingApproval,
    Pending,
    Confirmed,
    Cancelled,
}

impl HangoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HangoutStatus::PendingApproval => "pending_approval",
            HangoutStatus::Pending => "pending",
            HangoutStatus::Confirmed => "confirmed",
            HangoutStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for HangoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HangoutStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_approval" => Ok(HangoutStatus::PendingApproval),
            "pending" => Ok(HangoutStatus::Pending),
            "confirmed" => Ok(HangoutStatus::Confirmed),
            "cancelled" => Ok(HangoutStatus::Cancelled),
            other => Err(UnknownStatus {
                kind: "hangout",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for HangoutStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A planned activity. The host is a member but is never stored in `participants`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hangout {
    pub id: Uuid,
    pub host_id: Uuid,
    pub participants: Vec<Uuid>,
    pub accepted_by: Vec<Uuid>,
    pub rejected_by: Vec<Uuid>,
    /// Invited second-degree users with no mutual friend to approve them.
    pub unreachable_participant_ids: Vec<Uuid>,
    pub activity_description: String,
    pub details: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: HangoutStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hangout {
    /// A fresh hangout with the host already accepted.
    pub fn new(host_id: Uuid, participants: Vec<Uuid>, new_hangout: &NewHangout) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            host_id,
            participants,
            accepted_by: vec![host_id],
            rejected_by: Vec::new(),
            unreachable_participant_ids: Vec::new(),
            activity_description: new_hangout.activity_description.trim().to_string(),
            details: new_hangout.details.clone(),
            scheduled_at: new_hangout.scheduled_at.unwrap_or(now),
            status: HangoutStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Host first, then participants in invitation order.
    pub fn members(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.host_id).chain(self.participants.iter().copied())
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.host_id == user_id || self.participants.contains(&user_id)
    }

    pub fn member_count(&self) -> usize {
        self.participants.len() + 1
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewHangout {
    pub participant_ids: Vec<Uuid>,
    pub activity_description: String,
    pub details: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}
