use crate::errors::app_error::AppResult;
use crate::http::extract::AppJson;
use crate::http::middleware::authentication::session_cookie;
use crate::state::AppState;
use crate::stores::{identity, sessions};
use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use log::trace;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct Login {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<Login>,
) -> AppResult<impl IntoResponse> {
    let connection = &mut state.pool.get()?;
    let user = identity::authenticate(connection, &payload.email, &payload.password)?;

    sessions::prune_expired(connection, user.id, Utc::now().naive_utc())?;

    let lifetime = Duration::hours(state.config.session_lifetime_hours);
    let token = sessions::issue_token(connection, user.id, lifetime)?;

    trace!("{} logged in", user.email);
    Ok((
        [(SET_COOKIE, session_cookie(&token, lifetime.num_seconds()))],
        Json(json!({ "token": token })),
    ))
}
