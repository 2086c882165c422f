//! Core types, traits, errors, config, events, and tracing setup for Sage.
//!
//! This crate carries no pipeline logic — the observation/intervention
//! engine lives in `sage-engine`.

pub mod config;
pub mod errors;
pub mod events;
pub mod trace;
pub mod traits;
pub mod types;
