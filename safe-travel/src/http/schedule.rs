use crate::errors::app_error::{AppError, AppResult};
use crate::http::extract::{AppJson, AppPath};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::schedule::{self, ScheduleDraft};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::NaiveTime;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct AddScheduleEntry {
    #[serde(default)]
    weekday: String,
    #[serde(default)]
    course_name: String,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    end_time: String,
    #[serde(default)]
    room: String,
}

fn parse_class_time(input: &str, field: &str) -> AppResult<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| AppError::validation(format!("{field} must look like HH:MM")))
}

pub async fn add_schedule_entry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(payload): AppJson<AddScheduleEntry>,
) -> AppResult<impl IntoResponse> {
    let start_time = parse_class_time(&payload.start_time, "Start time")?;
    let end_time = parse_class_time(&payload.end_time, "End time")?;
    let connection = &mut state.pool.get()?;

    let entry = schedule::add_entry(
        connection,
        &user,
        &ScheduleDraft {
            weekday: &payload.weekday,
            course_name: &payload.course_name,
            start_time,
            end_time,
            room: &payload.room,
        },
    )?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_schedule_entry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(entry_id): AppPath<i32>,
) -> AppResult<Json<String>> {
    let connection = &mut state.pool.get()?;
    schedule::delete_entry(connection, &user, entry_id)?;

    Ok(Json(String::from("Schedule entry deleted")))
}
