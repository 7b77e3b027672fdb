//! Error types for seequell

use thiserror::Error;

/// Errors produced while loading captures, analyzing queries or rendering reports
#[derive(Debug, Error)]
pub enum SeequellError {
    /// Caller supplied data the analyzer cannot work with
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
        record_index: Option<usize>,
        sql: Option<String>,
    },

    /// Bad configuration value or missing required setting
    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SeequellError {
    /// True when the error came from bad analyzer input rather than the environment
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SeequellError::InvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, SeequellError>;

/// Build an [`SeequellError::InvalidInput`] not tied to a specific record
pub fn invalid_input(message: impl Into<String>) -> SeequellError {
    SeequellError::InvalidInput {
        message: message.into(),
        record_index: None,
        sql: None,
    }
}

/// Build an [`SeequellError::InvalidInput`] for the record at `index`
pub fn invalid_record(message: impl Into<String>, index: usize, sql: &str) -> SeequellError {
    SeequellError::InvalidInput {
        message: format!("record {}: {}", index, message.into()),
        record_index: Some(index),
        sql: Some(sql.to_string()),
    }
}

pub fn config_error(message: impl Into<String>, field: Option<&str>) -> SeequellError {
    SeequellError::Configuration {
        message: message.into(),
        field: field.map(str::to_string),
    }
}
