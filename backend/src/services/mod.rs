//! Connection-gated hangout coordination.
//!
//! - [`graph`]: one-hop friend graph queries
//! - [`approval`]: who needs a mutual friend's approval, and from whom
//! - [`lifecycle`]: hangout status transitions and responses
//! - [`eligibility`]: whether a member may respond right now
//! - [`engine`]: the operations above run against a [`crate::db::Store`]

pub mod approval;
pub mod eligibility;
pub mod engine;
pub mod graph;
pub mod lifecycle;
mod error;

pub use approval::{ApprovalPlan, Standing};
pub use eligibility::can_respond;
pub use engine::{EngineSettings, HangoutEngine};
pub use error::{EngineError, EngineResult};
pub use graph::SocialGraph;
pub use lifecycle::{LifecyclePolicy, Response};
