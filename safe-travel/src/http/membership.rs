use crate::errors::app_error::AppResult;
use crate::http::extract::AppPath;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::membership::{self, JoinOutcome, LeaveOutcome};
use axum::extract::State;
use axum::{Extension, Json};

pub async fn join_group(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(group_id): AppPath<i32>,
) -> AppResult<Json<String>> {
    let connection = &mut state.pool.get()?;

    let notice = match membership::join_group(connection, &user, group_id)? {
        JoinOutcome::Joined => "Joined group",
        JoinOutcome::AlreadyMember => "You are already a member of this group",
    };

    Ok(Json(String::from(notice)))
}

/// Leaving a group you are not in is reported as a notice, not an error
pub async fn leave_group(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(group_id): AppPath<i32>,
) -> AppResult<Json<String>> {
    let connection = &mut state.pool.get()?;

    let notice = match membership::leave_group(connection, &user, group_id)? {
        LeaveOutcome::Left => "Left group",
        LeaveOutcome::NotAMember => "You are not a member of this group",
    };

    Ok(Json(String::from(notice)))
}
