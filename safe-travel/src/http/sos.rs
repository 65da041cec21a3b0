use crate::errors::app_error::{AppError, AppResult};
use crate::models::transient::authenticated_user::AuthenticatedUser;
use crate::state::AppState;
use crate::stores::identity;
use crate::telephony::sos_message;
use axum::extract::State;
use axum::{Extension, Json};
use log::info;
use serde::Serialize;

#[derive(Serialize)]
pub struct SosSent {
    message: String,
    call_id: String,
}

/// Places a single call to the caller's emergency contact. No retries.
pub async fn send_sos(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<SosSent>> {
    let emergency_contact = {
        let connection = &mut state.pool.get()?;
        identity::find_user(connection, user.id)?.emergency_contact
    };

    let Some(emergency_contact) = emergency_contact else {
        return Err(AppError::validation(
            "Add an emergency contact to your profile before sending an SOS",
        ));
    };

    let receipt = state
        .telephony
        .place_call(&emergency_contact, &sos_message(&user.name))
        .await?;

    info!("{} sent an SOS, call {}", user.email, receipt.call_id);
    Ok(Json(SosSent {
        message: String::from("SOS call placed to your emergency contact"),
        call_id: receipt.call_id,
    }))
}
