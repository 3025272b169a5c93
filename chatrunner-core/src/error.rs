use thiserror::Error;

use crate::message::MessageKind;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfigValue { field: String, reason: String },

    #[error("{kind} message is {length} characters long; the limit is {max}")]
    MessageTooLong {
        kind: MessageKind,
        length: usize,
        max: usize,
    },

    // --- gallery errors ---

    #[error("Gallery error: {0}")]
    Gallery(String),

    #[error("Gallery example '{name}' has no code")]
    EmptyExample { name: String },

    #[error("Duplicate gallery example '{name}'")]
    DuplicateExample { name: String },
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}
