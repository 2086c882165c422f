//! Error handling for Sage.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod adapter_error;
pub mod config_error;
pub mod error_code;
pub mod pipeline_error;
pub mod session_error;

pub use adapter_error::AdapterError;
pub use config_error::ConfigError;
pub use error_code::SageErrorCode;
pub use pipeline_error::PipelineError;
pub use session_error::SessionError;
