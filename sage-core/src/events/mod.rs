//! Session event system — synchronous dispatch to host-registered sinks.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::SessionEventHandler;
pub use types::*;
