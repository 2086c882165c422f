//! Stable machine-readable error codes for host-side telemetry.

pub const SESSION_INACTIVE: &str = "SAGE_SESSION_INACTIVE";
pub const SESSION_ALREADY_ACTIVE: &str = "SAGE_SESSION_ALREADY_ACTIVE";
pub const SESSION_NOT_INITIALIZED: &str = "SAGE_SESSION_NOT_INITIALIZED";
pub const ADAPTER_PANICKED: &str = "SAGE_ADAPTER_PANICKED";
pub const ADAPTER_MALFORMED: &str = "SAGE_ADAPTER_MALFORMED";
pub const CONFIG_PARSE: &str = "SAGE_CONFIG_PARSE";
pub const CONFIG_INVALID: &str = "SAGE_CONFIG_INVALID";

/// Every Sage error exposes a stable code independent of its display text.
pub trait SageErrorCode {
    fn error_code(&self) -> &'static str;
}
