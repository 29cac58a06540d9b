use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub profile_image_url: String,
    /// Ordered; the first mutual friend in this order becomes the approver.
    pub first_degree_friend_ids: Vec<Uuid>,
    /// Second-degree users this user may include without asking again. Append-only.
    pub approved_second_degree_connections: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_user.name,
            bio: new_user.bio,
            profile_image_url: new_user.profile_image_url,
            first_degree_friend_ids: Vec::new(),
            approved_second_degree_connections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_first_degree(&self, other: Uuid) -> bool {
        self.first_degree_friend_ids.contains(&other)
    }

    pub fn has_approved(&self, other: Uuid) -> bool {
        self.approved_second_degree_connections.contains(&other)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

/// The slice of a user shown next to hangouts and requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub profile_image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    pub profile_image_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub friend_ids: Option<Vec<Uuid>>,
}
