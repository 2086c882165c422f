//! Capability traits injected by the host.

pub mod speech;

pub use speech::SpeechSink;
