//! Domain adapter faults. Always caught at the dispatch boundary and
//! degraded to the generic fallback — never fatal to the session.

use super::error_code::{self, SageErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Adapter '{domain}' panicked during {operation}")]
    Panicked {
        domain: String,
        operation: &'static str,
    },

    #[error("Adapter '{domain}' returned malformed output: {detail}")]
    Malformed { domain: String, detail: String },
}

impl SageErrorCode for AdapterError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Panicked { .. } => error_code::ADAPTER_PANICKED,
            Self::Malformed { .. } => error_code::ADAPTER_MALFORMED,
        }
    }
}
