//! Configuration errors.

use super::error_code::{self, BlanketErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl BlanketErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => error_code::CONFIG_IO,
            Self::Toml(_) => error_code::CONFIG_TOML,
            Self::Invalid { .. } => error_code::CONFIG_INVALID,
        }
    }
}
