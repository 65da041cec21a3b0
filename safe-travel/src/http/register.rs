use crate::errors::app_error::AppResult;
use crate::http::extract::AppJson;
use crate::state::AppState;
use crate::stores::identity::{self, Registration};
use axum::response::IntoResponse;
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateUser {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
    address: Option<String>,
    emergency_contact: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUser>,
) -> AppResult<impl IntoResponse> {
    let connection = &mut state.pool.get()?;

    identity::register(
        connection,
        &state.config.institutional_email,
        &Registration {
            email: &payload.email,
            password: &payload.password,
            name: &payload.name,
            address: payload.address.as_deref(),
            emergency_contact: payload.emergency_contact.as_deref(),
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(String::from("User created successfully")),
    ))
}
