//! One-hop friend graph queries over an explicit set of users.

use std::collections::HashMap;
use uuid::Uuid;

use super::error::{EngineError, EngineResult};
use crate::models::User;

/// The slice of the friend graph a single operation needs, loaded up front.
///
/// Friendship is directed: `a` listing `b` says nothing about `b` listing `a`.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    users: HashMap<Uuid, User>,
}

impl SocialGraph {
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    /// Friends in the order the user listed them. Unknown users have none.
    pub fn friends_of(&self, id: Uuid) -> &[Uuid] {
        self.users
            .get(&id)
            .map(|u| u.first_degree_friend_ids.as_slice())
            .unwrap_or_default()
    }

    pub fn is_first_degree(&self, of: Uuid, other: Uuid) -> bool {
        self.friends_of(of).contains(&other)
    }

    pub fn has_approved(&self, requester: Uuid, requested: Uuid) -> bool {
        self.users
            .get(&requester)
            .is_some_and(|u| u.has_approved(requested))
    }

    /// Friends of `a` that `b` also lists, in `a`'s order.
    pub fn mutual_friends(&self, a: Uuid, b: Uuid) -> Vec<Uuid> {
        let theirs = self.friends_of(b);
        self.friends_of(a)
            .iter()
            .copied()
            .filter(|friend| theirs.contains(friend))
            .collect()
    }
}

/// Dedupe `friend_ids` keeping first occurrences and enforce the size cap.
pub fn normalize_friend_list(owner_id: Uuid, friend_ids: &[Uuid], max_friends: usize) -> EngineResult<Vec<Uuid>> {
    if friend_ids.contains(&owner_id) {
        return Err(EngineError::Validation("a user cannot list themselves as a friend".to_string()));
    }

    let mut normalized: Vec<Uuid> = Vec::with_capacity(friend_ids.len());
    for id in friend_ids {
        if !normalized.contains(id) {
            normalized.push(*id);
        }
    }

    if normalized.len() > max_friends {
        return Err(EngineError::Validation(format!(
            "at most {} first-degree friends are allowed, got {}",
            max_friends,
            normalized.len()
        )));
    }

    Ok(normalized)
}
