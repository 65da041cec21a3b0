//! JSON shapes returned to clients. Timestamps are rendered in the display
//! timezone here and nowhere else.

use crate::display_time::format_display_time;
use crate::models::group::Group;
use crate::models::user::User;
use crate::stores::messaging::ChatMessage;
use crate::stores::reputation::{FiledReport, ReceivedReview};
use chrono::FixedOffset;
use serde::Serialize;

#[derive(Serialize)]
pub struct ProfileView {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub is_admin: bool,
    pub dark_mode: bool,
}

impl From<User> for ProfileView {
    fn from(user: User) -> Self {
        ProfileView {
            id: user.id,
            email: user.email,
            name: user.name,
            address: user.address,
            emergency_contact: user.emergency_contact,
            is_admin: user.is_admin,
            dark_mode: user.dark_mode,
        }
    }
}

#[derive(Serialize)]
pub struct GroupView {
    pub id: i32,
    pub name: String,
    pub destination: String,
    pub meeting_point: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub departure_time: String,
    pub to_campus: Option<bool>,
    pub created_by: i32,
}

impl GroupView {
    pub fn new(group: Group, zone: FixedOffset) -> Self {
        GroupView {
            id: group.id,
            name: group.name,
            destination: group.destination,
            meeting_point: group.meeting_point,
            latitude: group.latitude,
            longitude: group.longitude,
            departure_time: format_display_time(group.departure_time, zone),
            to_campus: group.to_campus,
            created_by: group.created_by,
        }
    }

    pub fn many(groups: Vec<Group>, zone: FixedOffset) -> Vec<Self> {
        groups
            .into_iter()
            .map(|group| GroupView::new(group, zone))
            .collect()
    }
}

#[derive(Serialize)]
pub struct MessageView {
    pub id: i32,
    pub sender_id: i32,
    pub sender_name: String,
    pub content: String,
    pub sent_at: String,
}

impl MessageView {
    pub fn new(chat: ChatMessage, zone: FixedOffset) -> Self {
        MessageView {
            id: chat.message.id,
            sender_id: chat.message.sender_id,
            sender_name: chat.sender_name,
            content: chat.message.content,
            sent_at: format_display_time(chat.message.created_at, zone),
        }
    }
}

#[derive(Serialize)]
pub struct ReviewView {
    pub id: i32,
    pub group_id: i32,
    pub reviewer_id: i32,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}

impl ReviewView {
    pub fn new(received: ReceivedReview, zone: FixedOffset) -> Self {
        ReviewView {
            id: received.review.id,
            group_id: received.review.group_id,
            reviewer_id: received.review.reviewer_id,
            reviewer_name: received.reviewer_name,
            rating: received.review.rating,
            comment: received.review.comment,
            created_at: format_display_time(received.review.created_at, zone),
        }
    }
}

#[derive(Serialize)]
pub struct ReportView {
    pub id: i32,
    pub group_id: i32,
    pub reporter_id: i32,
    pub reporter_name: String,
    pub reported_id: i32,
    pub reported_name: String,
    pub reason: String,
    pub created_at: String,
}

impl ReportView {
    pub fn new(filed: FiledReport, zone: FixedOffset) -> Self {
        ReportView {
            id: filed.report.id,
            group_id: filed.report.group_id,
            reporter_id: filed.report.reporter_id,
            reporter_name: filed.reporter_name,
            reported_id: filed.report.reported_id,
            reported_name: filed.reported_name,
            reason: filed.report.reason,
            created_at: format_display_time(filed.report.created_at, zone),
        }
    }
}
