use crate::errors::app_error::AppResult;
use crate::http::extract::AppJson;
use crate::http::views::ProfileView;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::identity::{self, ProfileChanges};
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct UpdateProfile {
    name: Option<String>,
    address: Option<String>,
    emergency_contact: Option<String>,
    dark_mode: Option<bool>,
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ProfileView>> {
    let connection = &mut state.pool.get()?;
    let profile = identity::find_user(connection, user.id)?;

    Ok(Json(ProfileView::from(profile)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(payload): AppJson<UpdateProfile>,
) -> AppResult<Json<ProfileView>> {
    let connection = &mut state.pool.get()?;

    let updated = identity::update_profile(
        connection,
        &user,
        &ProfileChanges {
            name: payload.name.as_deref(),
            address: payload.address.as_deref(),
            emergency_contact: payload.emergency_contact.as_deref(),
            dark_mode: payload.dark_mode,
        },
    )?;

    Ok(Json(ProfileView::from(updated)))
}
