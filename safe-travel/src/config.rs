use crate::errors::config_error::ConfigError;
use chrono::FixedOffset;
use log::{info, warn};
use regex::Regex;
use std::env;
use std::str::FromStr;

const DEFAULT_EMAIL_PATTERN: &str = r"(?i)^[^@\s]+@(?:[a-z0-9-]+\.)*(?:edu|bracu\.ac\.bd)$";

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub frontend_url: Option<String>,
    pub institutional_email: Regex,
    pub display_offset: FixedOffset,
    pub session_lifetime_hours: i64,
    pub admin: Option<AdminCredentials>,
    pub twilio: Option<TwilioConfig>,
}

impl Config {
    /// Loads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let institutional_email = Regex::new(
            &var("INSTITUTIONAL_EMAIL_PATTERN").unwrap_or_else(|| DEFAULT_EMAIL_PATTERN.to_string()),
        )
        .map_err(|error| ConfigError::InvalidValue {
            key: "INSTITUTIONAL_EMAIL_PATTERN",
            reason: error.to_string(),
        })?;

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminCredentials { email, password }),
            (Some(_), None) => return Err(ConfigError::MissingCompanion("ADMIN_EMAIL", "ADMIN_PASSWORD")),
            (None, _) => None,
        };

        let twilio = match (
            var("TWILIO_ACCOUNT_SID"),
            var("TWILIO_AUTH_TOKEN"),
            var("TWILIO_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
                api_base: var("TWILIO_API_BASE")
                    .unwrap_or_else(|| String::from("https://api.twilio.com")),
            }),
            (None, None, None) => None,
            (Some(_), None, _) => {
                return Err(ConfigError::MissingCompanion("TWILIO_ACCOUNT_SID", "TWILIO_AUTH_TOKEN"));
            }
            (Some(_), _, None) => {
                return Err(ConfigError::MissingCompanion("TWILIO_ACCOUNT_SID", "TWILIO_FROM_NUMBER"));
            }
            (None, _, _) => {
                return Err(ConfigError::MissingCompanion("TWILIO_AUTH_TOKEN", "TWILIO_ACCOUNT_SID"));
            }
        };

        Ok(Config {
            database_url: var("DATABASE_URL").unwrap_or_else(|| String::from("safe_travel.db")),
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| String::from("0.0.0.0:3000")),
            frontend_url: var("FRONTEND_URL"),
            institutional_email,
            display_offset: parse_or("DISPLAY_UTC_OFFSET", var("DISPLAY_UTC_OFFSET"), "+06:00")?,
            session_lifetime_hours: parse_or(
                "SESSION_LIFETIME_HOURS",
                var("SESSION_LIFETIME_HOURS"),
                "24",
            )?,
            admin,
            twilio,
        })
    }

    /// Logs the parts of the configuration that leave a feature disabled
    pub fn report(&self) {
        info!("Display timezone is UTC{}", self.display_offset);
        if self.admin.is_none() {
            warn!("ADMIN_EMAIL not set, reports will not be reachable by anyone");
        }
        if self.twilio.is_none() {
            warn!("Twilio credentials not set, SOS calls are disabled");
        }
        if self.frontend_url.is_none() {
            info!("FRONTEND_URL not set, CORS layer disabled");
        }
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .as_deref()
        .unwrap_or(default)
        .trim()
        .parse()
        .map_err(|error: T::Err| ConfigError::InvalidValue {
            key,
            reason: error.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, "safe_travel.db");
        assert_eq!(config.display_offset, FixedOffset::east_opt(6 * 3600).unwrap());
        assert_eq!(config.session_lifetime_hours, 24);
        assert!(config.admin.is_none());
        assert!(config.twilio.is_none());
        assert!(config.institutional_email.is_match("student1@g.bracu.ac.bd"));
        assert!(config.institutional_email.is_match("someone@mit.edu"));
        assert!(!config.institutional_email.is_match("someone@gmail.com"));
    }

    #[test]
    fn admin_email_requires_password() {
        let error = config_from(&[("ADMIN_EMAIL", "admin@g.bracu.ac.bd")]).unwrap_err();
        assert!(matches!(error, ConfigError::MissingCompanion("ADMIN_EMAIL", "ADMIN_PASSWORD")));
    }

    #[test]
    fn partial_twilio_credentials_are_rejected() {
        let error = config_from(&[("TWILIO_ACCOUNT_SID", "AC123")]).unwrap_err();
        assert!(matches!(error, ConfigError::MissingCompanion(_, _)));
    }

    #[test]
    fn invalid_offset_is_reported() {
        let error = config_from(&[("DISPLAY_UTC_OFFSET", "Dhaka")]).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidValue {
                key: "DISPLAY_UTC_OFFSET",
                ..
            }
        ));
    }
}
