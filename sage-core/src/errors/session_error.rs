//! Session lifecycle errors.

use super::error_code::{self, SageErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session is not active")]
    Inactive,

    #[error("Session '{0}' is already active")]
    AlreadyActive(String),

    #[error("Session has not been initialized")]
    NotInitialized,
}

impl SageErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Inactive => error_code::SESSION_INACTIVE,
            Self::AlreadyActive(_) => error_code::SESSION_ALREADY_ACTIVE,
            Self::NotInitialized => error_code::SESSION_NOT_INITIALIZED,
        }
    }
}
