use crate::display_time::parse_departure_time;
use crate::errors::app_error::AppResult;
use crate::http::extract::{AppJson, AppPath, AppQuery};
use crate::http::views::{GroupView, MessageView};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::policy::{Action, Resource, authorize};
use crate::state::AppState;
use crate::stores::groups::{self, GroupDraft};
use crate::stores::membership::{self, MemberSummary};
use crate::stores::messaging::{self, MAX_PAGE_SIZE};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateGroup {
    #[serde(default)]
    name: String,
    #[serde(default)]
    destination: String,
    meeting_point: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    departure_time: String,
    to_campus: Option<bool>,
}

#[derive(Deserialize)]
pub struct ChatPage {
    after: Option<i32>,
    limit: Option<i64>,
}

#[derive(Serialize)]
pub struct GroupDetail {
    group: GroupView,
    members: Vec<MemberSummary>,
    is_member: bool,
    is_creator: bool,
    /// Only present for participants
    messages: Option<Vec<MessageView>>,
}

pub async fn create_group(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(payload): AppJson<CreateGroup>,
) -> AppResult<impl IntoResponse> {
    let zone = state.config.display_offset;
    let departure_time = parse_departure_time(&payload.departure_time, zone)?;
    let connection = &mut state.pool.get()?;

    let group = groups::create_group(
        connection,
        &user,
        &GroupDraft {
            name: &payload.name,
            destination: &payload.destination,
            meeting_point: payload.meeting_point.as_deref(),
            latitude: payload.latitude,
            longitude: payload.longitude,
            departure_time,
            to_campus: payload.to_campus,
        },
    )?;

    Ok((StatusCode::CREATED, Json(GroupView::new(group, zone))))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(group_id): AppPath<i32>,
) -> AppResult<Json<String>> {
    let connection = &mut state.pool.get()?;
    groups::delete_group(connection, &user, group_id)?;

    Ok(Json(String::from("Group deleted successfully")))
}

pub async fn group_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(group_id): AppPath<i32>,
    AppQuery(page): AppQuery<ChatPage>,
) -> AppResult<Json<GroupDetail>> {
    let zone = state.config.display_offset;
    let connection = &mut state.pool.get()?;

    let group = groups::find_group(connection, group_id)?;
    let is_member = membership::is_member(connection, user.id, group.id)?;
    let resource = Resource::Group {
        group: &group,
        is_member,
    };
    authorize(&user, resource, Action::View)?;

    let messages = if authorize(&user, resource, Action::ReadMessages).is_ok() {
        let history = if page.after.is_some() || page.limit.is_some() {
            messaging::list_messages_after(
                connection,
                group.id,
                page.after,
                page.limit.unwrap_or(MAX_PAGE_SIZE),
            )?
        } else {
            messaging::list_messages(connection, group.id)?
        };

        Some(
            history
                .into_iter()
                .map(|chat| MessageView::new(chat, zone))
                .collect(),
        )
    } else {
        None
    };

    Ok(Json(GroupDetail {
        members: membership::members_of(connection, group.id)?,
        is_member,
        is_creator: group.created_by == user.id,
        messages,
        group: GroupView::new(group, zone),
    }))
}
