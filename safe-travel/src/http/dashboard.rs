use crate::errors::app_error::AppResult;
use crate::http::views::{GroupView, ProfileView};
use crate::models::schedule_entry::ScheduleEntry;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::{groups, identity, membership, schedule};
use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Dashboard {
    user: ProfileView,
    groups: Vec<GroupView>,
    joined_group_ids: Vec<i32>,
    nearby_groups: Vec<GroupView>,
    schedule: Vec<ScheduleEntry>,
}

/// Every group on the platform, plus the caller's own schedule and the
/// groups travelling near their address
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Dashboard>> {
    let zone = state.config.display_offset;
    let connection = &mut state.pool.get()?;

    let profile = identity::find_user(connection, user.id)?;
    let nearby_groups = match profile.address.as_deref() {
        Some(address) => groups::groups_matching_address(connection, address)?,
        None => Vec::new(),
    };

    Ok(Json(Dashboard {
        groups: GroupView::many(groups::list_groups(connection)?, zone),
        joined_group_ids: membership::group_ids_for(connection, user.id)?,
        nearby_groups: GroupView::many(nearby_groups, zone),
        schedule: schedule::list_entries(connection, user.id)?,
        user: ProfileView::from(profile),
    }))
}
