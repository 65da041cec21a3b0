use crate::errors::app_error::AppResult;
use crate::http::extract::AppJson;
use crate::http::views::ReportView;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::reputation::{self, ReportDraft};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SubmitReport {
    reported_id: i32,
    group_id: i32,
    #[serde(default)]
    reason: String,
}

pub async fn submit_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(payload): AppJson<SubmitReport>,
) -> AppResult<impl IntoResponse> {
    let connection = &mut state.pool.get()?;

    reputation::submit_report(
        connection,
        &user,
        &ReportDraft {
            reported_id: payload.reported_id,
            group_id: payload.group_id,
            reason: &payload.reason,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(String::from("Report submitted successfully")),
    ))
}

/// Every report filed on the platform, admins only
pub async fn reports(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<ReportView>>> {
    let zone = state.config.display_offset;
    let connection = &mut state.pool.get()?;

    let reports = reputation::list_reports(connection, &user)?
        .into_iter()
        .map(|filed| ReportView::new(filed, zone))
        .collect();

    Ok(Json(reports))
}
