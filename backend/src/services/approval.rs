//! Decides which invited participants need a mutual friend's approval.

use tracing::debug;
use uuid::Uuid;

use super::graph::SocialGraph;
use super::lifecycle;
use crate::models::{ConnectionRequest, HangoutStatus, User};

/// How a candidate participant relates to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    FirstDegree,
    /// Approved for this host in an earlier hangout; approval never expires.
    ApprovedSecondDegree,
    NeedsApproval { approver_id: Uuid },
    /// No mutual friend exists, so nobody can approve the invitation.
    Unreachable,
}

/// Outcome of evaluating every candidate for a new hangout.
#[derive(Debug, Clone)]
pub struct ApprovalPlan {
    pub initial_status: HangoutStatus,
    pub requests: Vec<ConnectionRequest>,
    pub unreachable: Vec<Uuid>,
}

pub fn classify(graph: &SocialGraph, host: &User, candidate_id: Uuid) -> Standing {
    if host.is_first_degree(candidate_id) {
        return Standing::FirstDegree;
    }
    if host.has_approved(candidate_id) {
        return Standing::ApprovedSecondDegree;
    }

    // First match in the host's own friend order.
    match graph.mutual_friends(host.id, candidate_id).first() {
        Some(&approver_id) => Standing::NeedsApproval { approver_id },
        None => Standing::Unreachable,
    }
}

/// Build the requests a hangout needs before it can leave `pending_approval`.
pub fn plan(graph: &SocialGraph, host: &User, hangout_id: Uuid, candidates: &[Uuid]) -> ApprovalPlan {
    let mut requests = Vec::new();
    let mut unreachable = Vec::new();

    for &candidate_id in candidates {
        let standing = classify(graph, host, candidate_id);
        debug!("Participant {} of hangout {} is {:?}", candidate_id, hangout_id, standing);

        match standing {
            Standing::FirstDegree | Standing::ApprovedSecondDegree => {}
            Standing::NeedsApproval { approver_id } => {
                requests.push(ConnectionRequest::pending(host.id, candidate_id, approver_id, hangout_id));
            }
            Standing::Unreachable => unreachable.push(candidate_id),
        }
    }

    ApprovalPlan {
        initial_status: lifecycle::initial_status(requests.len()),
        requests,
        unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;

    fn user(name: &str) -> User {
        User::new(NewUser {
            name: name.to_string(),
            bio: String::new(),
            profile_image_url: String::new(),
        })
    }

    struct Fixture {
        host: User,
        bob: User,
        carol: User,
        dave: User,
        erin: User,
    }

    /// host -> {bob, carol}; dave -> {carol, bob}; erin -> {}.
    fn fixture() -> Fixture {
        let mut host = user("host");
        let bob = user("bob");
        let carol = user("carol");
        let mut dave = user("dave");
        let erin = user("erin");
        host.first_degree_friend_ids = vec![bob.id, carol.id];
        dave.first_degree_friend_ids = vec![carol.id, bob.id];
        Fixture { host, bob, carol, dave, erin }
    }

    fn graph(f: &Fixture) -> SocialGraph {
        SocialGraph::from_users([f.host.clone(), f.bob.clone(), f.carol.clone(), f.dave.clone(), f.erin.clone()])
    }

    #[test]
    fn test_first_degree_only_needs_no_requests() {
        let f = fixture();
        let plan = plan(&graph(&f), &f.host, Uuid::new_v4(), &[f.bob.id, f.carol.id]);

        assert_eq!(plan.initial_status, HangoutStatus::Pending);
        assert!(plan.requests.is_empty());
        assert!(plan.unreachable.is_empty());
    }

    #[test]
    fn test_approver_is_first_mutual_in_host_order() {
        let f = fixture();
        let hangout_id = Uuid::new_v4();
        let plan = plan(&graph(&f), &f.host, hangout_id, &[f.bob.id, f.dave.id]);

        assert_eq!(plan.initial_status, HangoutStatus::PendingApproval);
        assert_eq!(plan.requests.len(), 1);
        let request = &plan.requests[0];
        assert_eq!(request.requester_id, f.host.id);
        assert_eq!(request.requested_id, f.dave.id);
        assert_eq!(request.approver_id, f.bob.id);
        assert_eq!(request.hangout_id, hangout_id);
        assert!(request.is_pending());
    }

    #[test]
    fn test_previously_approved_skips_request() {
        let mut f = fixture();
        f.host.approved_second_degree_connections.push(f.dave.id);
        let g = graph(&f);

        assert_eq!(classify(&g, &f.host, f.dave.id), Standing::ApprovedSecondDegree);
        let plan = plan(&g, &f.host, Uuid::new_v4(), &[f.dave.id]);
        assert!(plan.requests.is_empty());
        assert_eq!(plan.initial_status, HangoutStatus::Pending);
    }

    #[test]
    fn test_no_mutual_friend_is_unreachable() {
        let f = fixture();
        let plan = plan(&graph(&f), &f.host, Uuid::new_v4(), &[f.erin.id, f.dave.id]);

        assert_eq!(plan.unreachable, vec![f.erin.id]);
        assert_eq!(plan.requests.len(), 1);
        assert_eq!(plan.initial_status, HangoutStatus::PendingApproval);
    }

    #[test]
    fn test_reverse_friendship_does_not_count_as_first_degree() {
        let mut f = fixture();
        // erin lists the host, but the host does not list erin.
        f.erin.first_degree_friend_ids = vec![f.host.id];
        assert_eq!(classify(&graph(&f), &f.host, f.erin.id), Standing::Unreachable);
    }
}
