//! Unified Error Model
//!
//! Generator failures carry their own `GEN/` prefix on [`GenerationError`].
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyflowError {
    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("SERIALIZE/{0}")]
    SerializeError(String),

    #[error("BATCH/{0}")]
    BatchError(String),
}

impl From<serde_json::Error> for CopyflowError {
    fn from(err: serde_json::Error) -> Self {
        CopyflowError::SerializeError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CopyflowError {
    fn from(err: serde_yaml::Error) -> Self {
        CopyflowError::ConfigError(err.to_string())
    }
}
