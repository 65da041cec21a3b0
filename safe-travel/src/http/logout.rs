use crate::errors::app_error::AppResult;
use crate::http::middleware::authentication::session_cookie;
use crate::models::transient::authenticated_user::{AuthenticatedUser, SessionToken};
use crate::state::AppState;
use crate::stores::sessions;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use log::trace;

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> AppResult<impl IntoResponse> {
    let connection = &mut state.pool.get()?;
    sessions::revoke_token(connection, &token)?;

    trace!("{} logged out", user.email);
    Ok((
        [(SET_COOKIE, session_cookie("", 0))],
        Json(String::from("Logged out")),
    ))
}
