
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Contract Violation: {0}")]
    Validation(String),
}

pub type MfResult<T> = Result<T, ModelForgeError>;
