use crate::errors::app_error::AppResult;
use crate::http::extract::{AppJson, AppPath};
use crate::http::views::MessageView;
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::messaging::{self, ChatMessage};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SendMessage {
    #[serde(default)]
    content: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppPath(group_id): AppPath<i32>,
    AppJson(payload): AppJson<SendMessage>,
) -> AppResult<impl IntoResponse> {
    let connection = &mut state.pool.get()?;
    let message = messaging::post_message(connection, &user, group_id, &payload.content)?;

    let chat = ChatMessage {
        message,
        sender_name: user.name,
    };
    Ok((
        StatusCode::CREATED,
        Json(MessageView::new(chat, state.config.display_offset)),
    ))
}
