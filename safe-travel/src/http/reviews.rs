use crate::errors::app_error::AppResult;
use crate::http::extract::AppJson;
use crate::http::views::ReviewView;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::reputation::{self, ReviewDraft};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SubmitReview {
    reviewed_id: i32,
    group_id: i32,
    rating: i32,
    #[serde(default)]
    comment: String,
}

pub async fn submit_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(payload): AppJson<SubmitReview>,
) -> AppResult<impl IntoResponse> {
    let connection = &mut state.pool.get()?;

    reputation::submit_review(
        connection,
        &user,
        &ReviewDraft {
            reviewed_id: payload.reviewed_id,
            group_id: payload.group_id,
            rating: payload.rating,
            comment: &payload.comment,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(String::from("Review submitted successfully")),
    ))
}

pub async fn my_reviews(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<ReviewView>>> {
    let zone = state.config.display_offset;
    let connection = &mut state.pool.get()?;

    let reviews = reputation::list_reviews_for(connection, user.id)?
        .into_iter()
        .map(|received| ReviewView::new(received, zone))
        .collect();

    Ok(Json(reviews))
}
