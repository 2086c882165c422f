//! Configuration for the observation engine.

pub mod engine_config;

pub use engine_config::EngineConfig;
