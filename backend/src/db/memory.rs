use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    ConnectionRequestFilter, ConnectionRequestStore, HangoutFilter, HangoutStore, Result,
    UserStore,
};
use crate::models::{ConnectionRequest, Hangout, HangoutStatus, RequestStatus, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    /// Insertion order doubles as creation order.
    hangouts: Vec<Hangout>,
    requests: Vec<ConnectionRequest>,
}

/// In-process store behind a single lock, so every call is atomic.
///
/// Suitable for tests and local experiments; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.clone())
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.lock().await;
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                existing.name = user.name.clone();
                existing.bio = user.bio.clone();
                existing.profile_image_url = user.profile_image_url.clone();
                existing.first_degree_friend_ids = user.first_degree_friend_ids.clone();
                existing.updated_at = Utc::now();
            }
            None => tables.users.push(user.clone()),
        }
        Ok(())
    }

    async fn add_approved_connection(&self, requester_id: Uuid, requested_id: Uuid) -> Result<()> {
        let mut tables = self.tables.lock().await;
        if let Some(requester) = tables.users.iter_mut().find(|u| u.id == requester_id) {
            if !requester.has_approved(requested_id) {
                requester.approved_second_degree_connections.push(requested_id);
                requester.updated_at = Utc::now();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HangoutStore for MemoryStore {
    async fn find_hangout(&self, id: Uuid) -> Result<Option<Hangout>> {
        let tables = self.tables.lock().await;
        Ok(tables.hangouts.iter().find(|h| h.id == id).cloned())
    }

    async fn find_hangouts(&self, filter: &HangoutFilter) -> Result<Vec<Hangout>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .hangouts
            .iter()
            .rev()
            .filter(|h| filter.member_id.is_none_or(|id| h.is_member(id)))
            .filter(|h| !(filter.exclude_cancelled && h.status == HangoutStatus::Cancelled))
            .cloned()
            .collect())
    }

    async fn create_hangout(&self, hangout: &Hangout, requests: &[ConnectionRequest]) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables.hangouts.push(hangout.clone());
        tables.requests.extend_from_slice(requests);
        Ok(())
    }

    async fn save_responses(&self, hangout: &Hangout) -> Result<()> {
        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables.hangouts.iter_mut().find(|h| h.id == hangout.id) {
            existing.accepted_by = hangout.accepted_by.clone();
            existing.rejected_by = hangout.rejected_by.clone();
            existing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn transition_hangout(&self, id: Uuid, from: HangoutStatus, to: HangoutStatus) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        match tables.hangouts.iter_mut().find(|h| h.id == id && h.status == from) {
            Some(hangout) => {
                hangout.status = to;
                hangout.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn confirm_hangout(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.lock().await;
        let confirmable = |h: &Hangout| {
            h.id == id && matches!(h.status, HangoutStatus::Pending | HangoutStatus::PendingApproval)
        };
        match tables.hangouts.iter_mut().find(|h| confirmable(h)) {
            Some(hangout) => {
                hangout.status = HangoutStatus::Confirmed;
                hangout.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn cancel_hangout(&self, id: Uuid, from: HangoutStatus) -> Result<Option<u64>> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();

        match tables.hangouts.iter_mut().find(|h| h.id == id && h.status == from) {
            Some(hangout) => {
                hangout.status = HangoutStatus::Cancelled;
                hangout.updated_at = now;
            }
            None => return Ok(None),
        }

        let mut rejected = 0;
        for request in tables.requests.iter_mut().filter(|r| r.hangout_id == id && r.is_pending()) {
            request.status = RequestStatus::Rejected;
            request.updated_at = now;
            rejected += 1;
        }

        Ok(Some(rejected))
    }
}

#[async_trait]
impl ConnectionRequestStore for MemoryStore {
    async fn find_request(&self, id: Uuid) -> Result<Option<ConnectionRequest>> {
        let tables = self.tables.lock().await;
        Ok(tables.requests.iter().find(|r| r.id == id).cloned())
    }

    async fn find_requests(&self, filter: &ConnectionRequestFilter) -> Result<Vec<ConnectionRequest>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .requests
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn count_pending(&self, hangout_id: Uuid) -> Result<i64> {
        let tables = self.tables.lock().await;
        let count = tables
            .requests
            .iter()
            .filter(|r| r.hangout_id == hangout_id && r.is_pending())
            .count();
        Ok(count as i64)
    }

    async fn insert_requests(&self, requests: &[ConnectionRequest]) -> Result<()> {
        let mut tables = self.tables.lock().await;
        tables.requests.extend_from_slice(requests);
        Ok(())
    }

    async fn update_request_status(&self, filter: &ConnectionRequestFilter, status: RequestStatus) -> Result<u64> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let mut updated = 0;
        for request in tables.requests.iter_mut().filter(|r| filter.matches(r)) {
            request.status = status;
            request.updated_at = now;
            updated += 1;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewHangout, NewUser};

    fn user(name: &str) -> User {
        User::new(NewUser {
            name: name.to_string(),
            bio: String::new(),
            profile_image_url: format!("https://img.example/{name}.png"),
        })
    }

    fn hangout(host_id: Uuid, participants: Vec<Uuid>) -> Hangout {
        let new_hangout = NewHangout {
            participant_ids: participants.clone(),
            activity_description: "Climbing".to_string(),
            details: None,
            scheduled_at: None,
        };
        Hangout::new(host_id, participants, &new_hangout)
    }

    #[tokio::test]
    async fn test_save_user_keeps_approved_set() {
        let store = MemoryStore::new();
        let mut alice = user("alice");
        let dave = Uuid::new_v4();
        store.save_user(&alice).await.unwrap();
        store.add_approved_connection(alice.id, dave).await.unwrap();
        store.add_approved_connection(alice.id, dave).await.unwrap();

        // A stale copy without the approval must not erase it.
        alice.name = "Alice".to_string();
        store.save_user(&alice).await.unwrap();

        let stored = store.find_user(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.approved_second_degree_connections, vec![dave]);
    }

    #[tokio::test]
    async fn test_transition_only_from_expected_status() {
        let store = MemoryStore::new();
        let mut h = hangout(Uuid::new_v4(), vec![Uuid::new_v4()]);
        h.status = HangoutStatus::PendingApproval;
        store.create_hangout(&h, &[]).await.unwrap();

        assert!(store.transition_hangout(h.id, HangoutStatus::PendingApproval, HangoutStatus::Pending).await.unwrap());
        assert!(!store.transition_hangout(h.id, HangoutStatus::PendingApproval, HangoutStatus::Pending).await.unwrap());
        assert_eq!(store.find_hangout(h.id).await.unwrap().unwrap().status, HangoutStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_hangouts_newest_first_for_member() {
        let store = MemoryStore::new();
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let first = hangout(host, vec![guest]);
        let second = hangout(host, vec![guest]);
        let unrelated = hangout(Uuid::new_v4(), vec![Uuid::new_v4()]);
        for h in [&first, &second, &unrelated] {
            store.create_hangout(h, &[]).await.unwrap();
        }

        let filter = HangoutFilter { member_id: Some(guest), exclude_cancelled: true };
        let found: Vec<Uuid> = store.find_hangouts(&filter).await.unwrap().iter().map(|h| h.id).collect();
        assert_eq!(found, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_status_counts_matches() {
        let store = MemoryStore::new();
        let hangout_id = Uuid::new_v4();
        let requests = vec![
            ConnectionRequest::pending(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), hangout_id),
            ConnectionRequest::pending(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), hangout_id),
        ];
        store.insert_requests(&requests).await.unwrap();

        let filter = ConnectionRequestFilter::pending_by_id(requests[0].id);
        assert_eq!(store.update_request_status(&filter, RequestStatus::Approved).await.unwrap(), 1);
        assert_eq!(store.update_request_status(&filter, RequestStatus::Rejected).await.unwrap(), 0);
        assert_eq!(store.count_pending(hangout_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_responses_leaves_status_alone() {
        let store = MemoryStore::new();
        let mut h = hangout(Uuid::new_v4(), vec![Uuid::new_v4()]);
        store.create_hangout(&h, &[]).await.unwrap();
        store.transition_hangout(h.id, HangoutStatus::Pending, HangoutStatus::Cancelled).await.unwrap();

        h.rejected_by.push(h.participants[0]);
        store.save_responses(&h).await.unwrap();

        let stored = store.find_hangout(h.id).await.unwrap().unwrap();
        assert_eq!(stored.status, HangoutStatus::Cancelled);
        assert_eq!(stored.rejected_by, h.rejected_by);
        assert!(!store.confirm_hangout(h.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_rejects_pending_requests_together() {
        let store = MemoryStore::new();
        let mut h = hangout(Uuid::new_v4(), vec![Uuid::new_v4(), Uuid::new_v4()]);
        h.status = HangoutStatus::PendingApproval;
        let mut resolved = ConnectionRequest::pending(h.host_id, h.participants[0], Uuid::new_v4(), h.id);
        resolved.status = RequestStatus::Approved;
        let waiting = ConnectionRequest::pending(h.host_id, h.participants[1], Uuid::new_v4(), h.id);
        let elsewhere = ConnectionRequest::pending(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.create_hangout(&h, &[resolved.clone(), waiting.clone()]).await.unwrap();
        store.insert_requests(&[elsewhere.clone()]).await.unwrap();

        // A stale status changes nothing at all.
        assert_eq!(store.cancel_hangout(h.id, HangoutStatus::Pending).await.unwrap(), None);
        assert_eq!(store.find_hangout(h.id).await.unwrap().unwrap().status, HangoutStatus::PendingApproval);
        assert_eq!(store.count_pending(h.id).await.unwrap(), 1);

        assert_eq!(store.cancel_hangout(h.id, HangoutStatus::PendingApproval).await.unwrap(), Some(1));
        assert_eq!(store.find_hangout(h.id).await.unwrap().unwrap().status, HangoutStatus::Cancelled);
        assert_eq!(store.find_request(waiting.id).await.unwrap().unwrap().status, RequestStatus::Rejected);
        assert_eq!(store.find_request(resolved.id).await.unwrap().unwrap().status, RequestStatus::Approved);
        assert!(store.find_request(elsewhere.id).await.unwrap().unwrap().is_pending());
    }
}
