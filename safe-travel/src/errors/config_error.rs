use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("{0} is set but {1} is not")]
    MissingCompanion(&'static str, &'static str),
}
