//! Hangout status transitions.
//!
//! ```text
//! pending_approval ──(last request resolved)──▶ pending ──(everyone accepted)──▶ confirmed
//!        │                                         │
//!        └───────────────(host cancels)────────────┴──▶ cancelled
//! ```
//!
//! Whether a confirmed hangout may still be cancelled is a [`LifecyclePolicy`] choice.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{EngineError, EngineResult};
use crate::models::{Hangout, HangoutStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LifecyclePolicy {
    pub allow_cancel_confirmed: bool,
}

impl LifecyclePolicy {
    /// Check that `caller` may cancel `hangout` in its current status.
    pub fn check_cancel(&self, hangout: &Hangout, caller: Uuid) -> EngineResult<()> {
        if hangout.host_id != caller {
            return Err(EngineError::Forbidden("only the host can cancel a hangout".to_string()));
        }

        match hangout.status {
            HangoutStatus::PendingApproval | HangoutStatus::Pending => Ok(()),
            HangoutStatus::Confirmed if self.allow_cancel_confirmed => Ok(()),
            HangoutStatus::Confirmed => Err(EngineError::Conflict(
                "a confirmed hangout can no longer be cancelled".to_string(),
            )),
            HangoutStatus::Cancelled => Err(EngineError::Conflict("hangout is already cancelled".to_string())),
        }
    }
}

pub fn initial_status(pending_requests: usize) -> HangoutStatus {
    if pending_requests > 0 {
        HangoutStatus::PendingApproval
    } else {
        HangoutStatus::Pending
    }
}

/// Record `user_id`'s answer, replacing any earlier one.
///
/// Returns true when this accept completed the member list and confirmed the
/// hangout. A confirmed hangout stays confirmed whatever is answered later.
pub fn apply_response(hangout: &mut Hangout, user_id: Uuid, response: Response) -> bool {
    hangout.accepted_by.retain(|id| *id != user_id);
    hangout.rejected_by.retain(|id| *id != user_id);

    match response {
        Response::Accept => hangout.accepted_by.push(user_id),
        Response::Reject => hangout.rejected_by.push(user_id),
    }

    let everyone_accepted = hangout.accepted_by.len() == hangout.member_count();
    let can_confirm = !matches!(hangout.status, HangoutStatus::Confirmed | HangoutStatus::Cancelled);
    if response == Response::Accept && everyone_accepted && can_confirm {
        hangout.status = HangoutStatus::Confirmed;
        return true;
    }

    false
}
