//! Access rules for every operation that touches data owned by someone else.
//!
//! The whole rule set lives in [`authorize`] so each gate is declared once
//! and can be tested on its own.

use crate::errors::app_error::{AppError, AppResult};
use crate::models::group::Group;
use crate::models::schedule_entry::ScheduleEntry;
use crate::models::transient::authenticated_user::AuthenticatedUser;

#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Group { group: &'a Group, is_member: bool },
    ScheduleEntry(&'a ScheduleEntry),
    Profile { owner_id: i32 },
    Reports,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Delete,
    Update,
    Join,
    Leave,
    PostMessage,
    ReadMessages,
    Review,
    Report,
}

pub fn authorize(actor: &AuthenticatedUser, resource: Resource<'_>, action: Action) -> AppResult<()> {
    let allowed = match (resource, action) {
        (Resource::Group { group, .. }, Action::Delete) => group.created_by == actor.id,
        (
            Resource::Group { .. },
            Action::View | Action::Join | Action::Leave | Action::Review | Action::Report,
        ) => true,
        (Resource::Group { group, is_member }, Action::PostMessage | Action::ReadMessages) => {
            is_member || group.created_by == actor.id
        }
        (Resource::ScheduleEntry(entry), Action::View | Action::Delete) => entry.user_id == actor.id,
        (Resource::Profile { owner_id }, Action::View | Action::Update) => owner_id == actor.id,
        (Resource::Reports, Action::View) => actor.is_admin,
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::Authorization(denial_message(resource, action)))
    }
}

fn denial_message(resource: Resource<'_>, action: Action) -> String {
    match (resource, action) {
        (Resource::Group { .. }, Action::Delete) => {
            String::from("Only the creator can delete this group")
        }
        (Resource::Group { .. }, Action::PostMessage) => {
            String::from("Join this group to send messages")
        }
        (Resource::Group { .. }, Action::ReadMessages) => {
            String::from("Join this group to read its messages")
        }
        (Resource::ScheduleEntry(_), _) => String::from("This schedule entry is not yours"),
        (Resource::Reports, _) => String::from("Only administrators can view reports"),
        _ => String::from("You are not allowed to do that"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn actor(id: i32, is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            email: format!("student{id}@g.bracu.ac.bd"),
            name: format!("Student {id}"),
            is_admin,
        }
    }

    fn group(created_by: i32) -> Group {
        let departure = NaiveDate::from_ymd_opt(2025, 5, 3)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .unwrap();
        Group {
            id: 1,
            name: String::from("CSE370 Study Group"),
            destination: String::from("BRACU Main Campus"),
            meeting_point: None,
            latitude: None,
            longitude: None,
            departure_time: departure,
            to_campus: Some(true),
            created_by,
            created_at: departure,
        }
    }

    #[test]
    fn only_creator_deletes_group() {
        let group = group(1);
        let resource = Resource::Group {
            group: &group,
            is_member: true,
        };

        assert!(authorize(&actor(1, false), resource, Action::Delete).is_ok());
        assert!(matches!(
            authorize(&actor(2, true), resource, Action::Delete),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn messaging_requires_participation() {
        let group = group(1);
        let outsider = Resource::Group {
            group: &group,
            is_member: false,
        };
        let member = Resource::Group {
            group: &group,
            is_member: true,
        };

        assert!(authorize(&actor(2, false), outsider, Action::PostMessage).is_err());
        assert!(authorize(&actor(2, false), outsider, Action::ReadMessages).is_err());
        assert!(authorize(&actor(2, false), member, Action::PostMessage).is_ok());
        // Creators participate without a membership row
        assert!(authorize(&actor(1, false), outsider, Action::PostMessage).is_ok());
    }

    #[test]
    fn joining_and_reporting_are_open() {
        let group = group(1);
        let resource = Resource::Group {
            group: &group,
            is_member: false,
        };

        for action in [Action::Join, Action::Leave, Action::View, Action::Report] {
            assert!(authorize(&actor(5, false), resource, action).is_ok());
        }
    }

    #[test]
    fn reports_are_admin_only() {
        assert!(authorize(&actor(1, true), Resource::Reports, Action::View).is_ok());
        assert!(matches!(
            authorize(&actor(2, false), Resource::Reports, Action::View),
            Err(AppError::Authorization(_))
        ));
    }

    #[test]
    fn schedule_entries_belong_to_their_owner() {
        let entry = ScheduleEntry {
            id: 7,
            user_id: 3,
            weekday: String::from("Monday"),
            course_name: String::from("CSE370 - Database Systems"),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            room: String::from("UB30401"),
        };

        assert!(authorize(&actor(3, false), Resource::ScheduleEntry(&entry), Action::Delete).is_ok());
        assert!(authorize(&actor(4, true), Resource::ScheduleEntry(&entry), Action::Delete).is_err());
    }

    #[test]
    fn undeclared_pairs_are_denied() {
        assert!(authorize(&actor(1, true), Resource::Reports, Action::Delete).is_err());
        assert!(authorize(&actor(1, false), Resource::Profile { owner_id: 2 }, Action::Update).is_err());
    }
}
