use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::approval;
use super::eligibility::can_respond;
use super::error::{EngineError, EngineResult};
use super::graph::{normalize_friend_list, SocialGraph};
use super::lifecycle::{self, LifecyclePolicy, Response};
use crate::constants::DEFAULT_MAX_FIRST_DEGREE_FRIENDS;
use crate::db::{ConnectionRequestFilter, HangoutFilter, Store};
use crate::models::{
    ConnectionRequest, ConnectionRequestView, Decision, Hangout, HangoutStatus, HangoutView,
    NewHangout, NewUser, ProfileUpdate, RequestStatus, User,
};

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub max_first_degree_friends: usize,
    pub lifecycle: LifecyclePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_first_degree_friends: DEFAULT_MAX_FIRST_DEGREE_FRIENDS,
            lifecycle: LifecyclePolicy::default(),
        }
    }
}

/// Hangout coordination over a [`Store`].
///
/// Every operation is a short read-modify-write against the store. Nothing is
/// cached between calls, so concurrent callers always decide on persisted state.
pub struct HangoutEngine<S> {
    store: Arc<S>,
    settings: EngineSettings,
}

impl<S: Store> HangoutEngine<S> {
    pub fn new(store: Arc<S>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // ===== Users =====

    pub async fn register_user(&self, new_user: NewUser) -> EngineResult<User> {
        if new_user.name.trim().is_empty() {
            return Err(EngineError::Validation("name must not be empty".to_string()));
        }

        let user = User::new(NewUser {
            name: new_user.name.trim().to_string(),
            ..new_user
        });
        self.store.save_user(&user).await?;
        info!("Registered user {} ({})", user.id, user.name);

        Ok(user)
    }

    pub async fn list_users(&self) -> EngineResult<Vec<User>> {
        Ok(self.store.list_users().await?)
    }

    pub async fn update_profile(&self, caller: Uuid, user_id: Uuid, update: ProfileUpdate) -> EngineResult<User> {
        if caller != user_id {
            return Err(EngineError::Forbidden("users can only update their own profile".to_string()));
        }

        let mut user = self.require_user(user_id).await?;

        if let Some(name) = update.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            user.name = name.to_string();
        }
        if let Some(bio) = update.bio {
            user.bio = bio;
        }
        if let Some(url) = update.profile_image_url.filter(|u| !u.trim().is_empty()) {
            user.profile_image_url = url;
        }
        if let Some(friend_ids) = update.friend_ids {
            let friend_ids = normalize_friend_list(user.id, &friend_ids, self.settings.max_first_degree_friends)?;
            self.require_all_users(&friend_ids).await?;
            user.first_degree_friend_ids = friend_ids;
        }

        self.store.save_user(&user).await?;
        info!("Updated profile of user {} ({} first-degree friends)", user.id, user.first_degree_friend_ids.len());

        self.require_user(user_id).await
    }

    // ===== Hangouts =====

    /// Create a hangout and the connection requests its second-degree
    /// participants need, persisted together.
    pub async fn create_hangout(&self, host_id: Uuid, new_hangout: NewHangout) -> EngineResult<HangoutView> {
        if new_hangout.activity_description.trim().is_empty() {
            return Err(EngineError::Validation("activity description must not be empty".to_string()));
        }
        let participants = normalize_participants(host_id, &new_hangout.participant_ids)?;

        let host = self.require_user(host_id).await?;
        let candidates = self.require_all_users(&participants).await?;
        let graph = SocialGraph::from_users(std::iter::once(host.clone()).chain(candidates));

        let mut hangout = Hangout::new(host_id, participants, &new_hangout);
        let plan = approval::plan(&graph, &host, hangout.id, &hangout.participants);
        hangout.status = plan.initial_status;
        hangout.unreachable_participant_ids = plan.unreachable;

        self.store.create_hangout(&hangout, &plan.requests).await?;

        info!(
            "Created hangout {} by {} with {} participants, status {} and {} connection requests",
            hangout.id,
            host_id,
            hangout.participants.len(),
            hangout.status,
            plan.requests.len()
        );
        if !hangout.unreachable_participant_ids.is_empty() {
            warn!(
                "Hangout {} has participants with no mutual friend to approve them: {:?}",
                hangout.id, hangout.unreachable_participant_ids
            );
        }

        self.project_one(hangout, host_id).await
    }

    /// Non-cancelled hangouts the user hosts or is invited to, newest first.
    pub async fn list_hangouts(&self, user_id: Uuid) -> EngineResult<Vec<HangoutView>> {
        let filter = HangoutFilter {
            member_id: Some(user_id),
            exclude_cancelled: true,
        };
        let hangouts = self.store.find_hangouts(&filter).await?;
        self.project(hangouts, user_id).await
    }

    pub async fn get_hangout(&self, viewer: Uuid, hangout_id: Uuid) -> EngineResult<HangoutView> {
        let hangout = self.require_hangout(hangout_id).await?;
        if !hangout.is_member(viewer) {
            return Err(EngineError::Forbidden("not a member of this hangout".to_string()));
        }
        self.project_one(hangout, viewer).await
    }

    /// Cancel a hangout and reject every connection request still waiting on it.
    pub async fn cancel_hangout(&self, caller: Uuid, hangout_id: Uuid) -> EngineResult<()> {
        let hangout = self.require_hangout(hangout_id).await?;
        self.settings.lifecycle.check_cancel(&hangout, caller)?;

        let rejected = self
            .store
            .cancel_hangout(hangout_id, hangout.status)
            .await?
            .ok_or_else(|| EngineError::Conflict("hangout changed while cancelling, try again".to_string()))?;

        info!(
            "Cancelled hangout {} (was {}), rejected {} pending connection requests",
            hangout_id, hangout.status, rejected
        );

        Ok(())
    }

    /// Accept or reject on behalf of `caller`, replacing any earlier answer.
    pub async fn respond(&self, caller: Uuid, hangout_id: Uuid, response: Response) -> EngineResult<HangoutView> {
        let hangout = self.require_hangout(hangout_id).await?;
        let host = self.require_user(hangout.host_id).await?;

        if !can_respond(caller, &hangout, &host) {
            return Err(EngineError::Forbidden(format!(
                "cannot respond to this hangout while it is {}",
                hangout.status
            )));
        }

        let hangout = self.record_response(hangout, caller, response).await?;
        self.project_one(hangout, caller).await
    }

    /// Write `caller`'s answer onto the hangout as read earlier and return it
    /// as now stored. Only the response sets are written; a status change
    /// made since the read is kept.
    async fn record_response(&self, mut hangout: Hangout, caller: Uuid, response: Response) -> EngineResult<Hangout> {
        let completes = lifecycle::apply_response(&mut hangout, caller, response);
        self.store.save_responses(&hangout).await?;

        if completes && self.store.confirm_hangout(hangout.id).await? {
            info!("Hangout {} confirmed: all {} members accepted", hangout.id, hangout.member_count());
        }

        self.require_hangout(hangout.id).await
    }

    // ===== Connection requests =====

    pub async fn list_pending_requests(&self, approver_id: Uuid) -> EngineResult<Vec<ConnectionRequestView>> {
        let requests = self
            .store
            .find_requests(&ConnectionRequestFilter::pending_for_approver(approver_id))
            .await?;

        let mut ids: Vec<Uuid> = requests
            .iter()
            .flat_map(|r| [r.requester_id, r.requested_id])
            .collect();
        ids.sort();
        ids.dedup();
        let users = self.user_map(&ids).await?;

        Ok(requests
            .into_iter()
            .filter_map(|request| {
                match (users.get(&request.requester_id), users.get(&request.requested_id)) {
                    (Some(requester), Some(requested)) => {
                        Some(ConnectionRequestView::new(request, requester.summary(), requested.summary()))
                    }
                    _ => {
                        warn!(
                            "Skipping connection request {}: requester {} or requested {} no longer exists",
                            request.id, request.requester_id, request.requested_id
                        );
                        None
                    }
                }
            })
            .collect())
    }

    /// Record the approver's decision and release the hangout once no request
    /// is left pending.
    pub async fn resolve_request(
        &self,
        caller: Uuid,
        request_id: Uuid,
        decision: Decision,
    ) -> EngineResult<ConnectionRequest> {
        let mut request = self
            .store
            .find_request(request_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("connection request {}", request_id)))?;

        if request.approver_id != caller {
            return Err(EngineError::Forbidden("not the approver of this request".to_string()));
        }
        if !request.is_pending() {
            return Err(EngineError::Conflict(format!("request was already {}", request.status)));
        }

        // Only one resolution can win the pending -> terminal update.
        let status = RequestStatus::from(decision);
        let claimed = self
            .store
            .update_request_status(&ConnectionRequestFilter::pending_by_id(request_id), status)
            .await?;
        if claimed == 0 {
            return Err(EngineError::Conflict("request was resolved concurrently".to_string()));
        }
        request.status = status;

        if decision == Decision::Approved {
            self.store
                .add_approved_connection(request.requester_id, request.requested_id)
                .await?;
        }

        info!(
            "Connection request {} {} by {} ({} -> {})",
            request_id, status, caller, request.requester_id, request.requested_id
        );

        self.release_if_approved(request.hangout_id).await?;

        Ok(request)
    }

    /// Move the hangout out of `pending_approval` when nothing is left pending.
    async fn release_if_approved(&self, hangout_id: Uuid) -> EngineResult<()> {
        let remaining = self.store.count_pending(hangout_id).await?;
        if remaining > 0 {
            return Ok(());
        }

        let released = self
            .store
            .transition_hangout(hangout_id, HangoutStatus::PendingApproval, HangoutStatus::Pending)
            .await?;
        if released {
            info!("Hangout {} cleared all approvals and is now pending", hangout_id);
        }

        Ok(())
    }

    // ===== Helpers =====

    async fn require_user(&self, id: Uuid) -> EngineResult<User> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {}", id)))
    }

    async fn require_hangout(&self, id: Uuid) -> EngineResult<Hangout> {
        self.store
            .find_hangout(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("hangout {}", id)))
    }

    /// Load every user in `ids`, failing on the first one that does not exist.
    async fn require_all_users(&self, ids: &[Uuid]) -> EngineResult<Vec<User>> {
        let users = self.store.find_users(ids).await?;
        if let Some(missing) = ids.iter().find(|id| !users.iter().any(|u| u.id == **id)) {
            return Err(EngineError::NotFound(format!("user {}", missing)));
        }
        Ok(users)
    }

    async fn user_map(&self, ids: &[Uuid]) -> EngineResult<HashMap<Uuid, User>> {
        Ok(self
            .store
            .find_users(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect())
    }

    async fn project_one(&self, hangout: Hangout, viewer: Uuid) -> EngineResult<HangoutView> {
        let mut views = self.project(vec![hangout], viewer).await?;
        views
            .pop()
            .ok_or_else(|| EngineError::NotFound("hangout".to_string()))
    }

    /// Attach host and member summaries, plus the viewer's eligibility.
    async fn project(&self, hangouts: Vec<Hangout>, viewer: Uuid) -> EngineResult<Vec<HangoutView>> {
        let mut ids: Vec<Uuid> = hangouts
            .iter()
            .flat_map(|h| h.members().chain(h.unreachable_participant_ids.iter().copied()))
            .collect();
        ids.sort();
        ids.dedup();
        let users = self.user_map(&ids).await?;

        let summaries = |ids: &[Uuid]| -> Vec<_> {
            ids.iter().filter_map(|id| users.get(id)).map(User::summary).collect()
        };

        hangouts
            .into_iter()
            .map(|hangout| -> EngineResult<HangoutView> {
                let host = users
                    .get(&hangout.host_id)
                    .ok_or_else(|| EngineError::NotFound(format!("host {} of hangout {}", hangout.host_id, hangout.id)))?;
                let participants = summaries(hangout.participants.as_slice());
                let unreachable = summaries(hangout.unreachable_participant_ids.as_slice());
                let eligible = can_respond(viewer, &hangout, host);
                Ok(HangoutView::new(hangout, host.summary(), participants, unreachable, eligible))
            })
            .collect()
    }
}

/// Dedupe invitees keeping first occurrences. The host is implicit and may
/// not be listed.
fn normalize_participants(host_id: Uuid, participant_ids: &[Uuid]) -> EngineResult<Vec<Uuid>> {
    if participant_ids.contains(&host_id) {
        return Err(EngineError::Validation(
            "the host is always part of the hangout and must not be invited".to_string(),
        ));
    }

    let mut participants: Vec<Uuid> = Vec::with_capacity(participant_ids.len());
    for id in participant_ids {
        if !participants.contains(id) {
            participants.push(*id);
        }
    }

    if participants.is_empty() {
        return Err(EngineError::Validation("a hangout needs at least one participant".to_string()));
    }

    Ok(participants)
}
