//! Pipeline error aggregate.

use super::error_code::SageErrorCode;
use super::{AdapterError, ConfigError, SessionError};

/// Errors that can surface from a processing cycle.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SageErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Session(e) => e.error_code(),
            Self::Adapter(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
