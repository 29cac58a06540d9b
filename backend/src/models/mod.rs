pub mod connection_requests;
pub mod hangouts;
pub mod users;
pub mod views;

pub use connection_requests::{ConnectionRequest, Decision, RequestStatus};
pub use hangouts::{Hangout, HangoutStatus, NewHangout};
pub use users::{NewUser, ProfileUpdate, User, UserSummary};
pub use views::{ConnectionRequestView, HangoutView};

use thiserror::Error;

/// A persisted status column held a value this build does not know about.
#[derive(Debug, Error)]
#[error("unknown {kind} status '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}
