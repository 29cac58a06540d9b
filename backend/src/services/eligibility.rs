use uuid::Uuid;

use crate::models::{Hangout, HangoutStatus, User};

/// Whether `user_id` may accept or reject `hangout` right now.
///
/// Members may always revise a confirmed plan. The host's first-degree
/// friends may answer while approvals are outstanding; everyone else waits
/// until the hangout is plain `pending`.
pub fn can_respond(user_id: Uuid, hangout: &Hangout, host: &User) -> bool {
    if !hangout.is_member(user_id) {
        return false;
    }

    match hangout.status {
        HangoutStatus::Confirmed => true,
        HangoutStatus::Pending => true,
        HangoutStatus::PendingApproval => host.is_first_degree(user_id),
        HangoutStatus::Cancelled => false,
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
            profile_image_url: String::new(),
        })
    }

    fn setup() -> (User, User, User, Hangout) {
        let friend = user("friend");
        let stranger = user("stranger");
        let mut host = user("host");
        host.first_degree_friend_ids = vec![friend.id];
        let new_hangout = NewHangout {
            participant_ids: vec![friend.id, stranger.id],
            activity_description: "Dinner".to_string(),
            details: None,
            scheduled_at: None,
        };
        let hangout = Hangout::new(host.id, vec![friend.id, stranger.id], &new_hangout);
        (host, friend, stranger, hangout)
    }

    #[test]
    fn test_second_degree_waits_for_approvals() {
        let (host, friend, stranger, mut hangout) = setup();

        hangout.status = HangoutStatus::PendingApproval;
        assert!(!can_respond(stranger.id, &hangout, &host));
        assert!(can_respond(friend.id, &hangout, &host));

        hangout.status = HangoutStatus::Pending;
        assert!(can_respond(stranger.id, &hangout, &host));
        assert!(can_respond(friend.id, &hangout, &host));
    }

    #[test]
    fn test_confirmed_and_cancelled() {
        let (host, friend, stranger, mut hangout) = setup();

        hangout.status = HangoutStatus::Confirmed;
        assert!(can_respond(stranger.id, &hangout, &host));
        assert!(can_respond(host.id, &hangout, &host));

        hangout.status = HangoutStatus::Cancelled;
        assert!(!can_respond(friend.id, &hangout, &host));
        assert!(!can_respond(host.id, &hangout, &host));
    }

    #[test]
    fn test_outsiders_never_respond() {
        let (host, _, _, mut hangout) = setup();
        let outsider = user("outsider");

        for status in [
            HangoutStatus::PendingApproval,
            HangoutStatus::Pending,
            HangoutStatus::Confirmed,
            HangoutStatus::Cancelled,
        ] {
            hangout.status = status;
            assert!(!can_respond(outsider.id, &hangout, &host));
        }
    }
}
