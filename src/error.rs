use thiserror::Error;

use crate::date::DateFormatError;

#[derive(Error, Debug)]
pub enum MinutaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date formatting failed for field '{field}': {source}")]
    DateFormat {
        field: String,
        #[source]
        source: DateFormatError,
    },

    #[error("Invalid context: {0}")]
    Context(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MinutaError>;
