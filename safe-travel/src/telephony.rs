//! Outbound SOS calls through an external voice provider.

use crate::config::TwilioConfig;
use crate::errors::app_error::{AppError, AppResult};
use async_trait::async_trait;
use log::{error, trace};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallReceipt {
    pub call_id: String,
}

#[async_trait]
pub trait Telephony: Send + Sync {
    /// Dials `to` and reads `spoken_message` aloud once answered
    async fn place_call(&self, to: &str, spoken_message: &str) -> AppResult<CallReceipt>;
}

/// Used when no provider credentials are configured
pub struct UnconfiguredTelephony;

#[async_trait]
impl Telephony for UnconfiguredTelephony {
    async fn place_call(&self, _to: &str, _spoken_message: &str) -> AppResult<CallReceipt> {
        Err(AppError::ExternalService(String::from(
            "SOS calling is not configured",
        )))
    }
}

pub struct TwilioTelephony {
    client: reqwest::Client,
    config: TwilioConfig,
}

#[derive(Deserialize)]
struct TwilioCall {
    sid: String,
}

/// Body of the `<Response>` TwiML document read out to the callee
#[derive(Serialize)]
struct SpokenResponse<'a> {
    #[serde(rename = "Say")]
    say: &'a str,
}

fn twiml(spoken_message: &str) -> AppResult<String> {
    let mut buffer = Vec::new();
    let mut writer = quick_xml::Writer::new(&mut buffer);

    writer
        .write_serializable("Response", &SpokenResponse { say: spoken_message })
        .map_err(|error| AppError::Internal(format!("Could not build TwiML: {error}")))?;

    String::from_utf8(buffer)
        .map_err(|error| AppError::Internal(format!("TwiML is not valid UTF-8: {error}")))
}

impl TwilioTelephony {
    pub fn new(config: TwilioConfig) -> Self {
        TwilioTelephony {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl Telephony for TwilioTelephony {
    async fn place_call(&self, to: &str, spoken_message: &str) -> AppResult<CallReceipt> {
        let document = twiml(spoken_message)?;

        let response = self
            .client
            .post(self.calls_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Twiml", document.as_str()),
            ])
            .send()
            .await
            .map_err(|error| {
                error!("Could not reach telephony provider: {error}");
                AppError::ExternalService(String::from("Could not reach the calling service"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Telephony provider refused call with {status}: {body}");
            return Err(AppError::ExternalService(String::from(
                "The calling service refused the SOS call",
            )));
        }

        let call: TwilioCall = response.json().await.map_err(|error| {
            error!("Unexpected telephony provider response: {error}");
            AppError::ExternalService(String::from(
                "The calling service sent an unexpected response",
            ))
        })?;

        trace!("Placed call {}", call.sid);
        Ok(CallReceipt { call_id: call.sid })
    }
}

pub fn sos_message(name: &str) -> String {
    format!(
        "This is an emergency alert from Safe Travel. {name} has requested help. Please contact them immediately."
    )
}
