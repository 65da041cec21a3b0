use crate::models::group::Group;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::models::user::User;
use crate::stores::groups::{GroupDraft, create_group};
use crate::stores::identity::{Registration, register};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::SqliteConnection;
use regex::Regex;

pub(crate) fn institutional_pattern() -> Regex {
    Regex::new(r"(?i)^[^@\s]+@(?:[a-z0-9-]+\.)*(?:edu|bracu\.ac\.bd)$").unwrap()
}

pub(crate) fn register_student(connection: &mut SqliteConnection, email: &str, name: &str) -> User {
    register(
        connection,
        &institutional_pattern(),
        &Registration {
            email,
            password: "password123",
            name,
            address: None,
            emergency_contact: None,
        },
    )
    .unwrap()
}

pub(crate) fn departure() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 3)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .unwrap()
}

pub(crate) fn create_trip(connection: &mut SqliteConnection, owner: &User, name: &str) -> Group {
    create_group(
        connection,
        &AuthenticatedUser::from(owner),
        &GroupDraft {
            name,
            destination: "BRACU Main Campus",
            meeting_point: Some("Mohakhali Flyover"),
            latitude: None,
            longitude: None,
            departure_time: departure(),
            to_campus: Some(true),
        },
    )
    .unwrap()
}
