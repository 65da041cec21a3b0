use crate::config::Config;
use crate::database::DbPool;
use crate::telephony::{Telephony, TwilioTelephony, UnconfiguredTelephony};
use std::sync::Arc;

/// Shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
    pub telephony: Arc<dyn Telephony>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        let telephony: Arc<dyn Telephony> = match config.twilio.clone() {
            Some(twilio) => Arc::new(TwilioTelephony::new(twilio)),
            None => Arc::new(UnconfiguredTelephony),
        };

        Self::with_telephony(pool, config, telephony)
    }

    pub fn with_telephony(pool: DbPool, config: Config, telephony: Arc<dyn Telephony>) -> Self {
        AppState {
            pool,
            config: Arc::new(config),
            telephony,
        }
    }
}
