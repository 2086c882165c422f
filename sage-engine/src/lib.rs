//! The Sage observation engine.
//!
//! Pipeline: snapshot → classify → spatial match → transformation detection →
//! domain adapter analysis → confidence gate → meaningful-event projection →
//! auto-intervention decision. See `session::ObservationSession` for the
//! per-session entry point and `intervention::decide` for the standalone
//! decision function.

pub mod adapters;
pub mod classify;
pub mod fingerprint;
pub mod gate;
pub mod intervention;
pub mod meaningful;
pub mod roi;
pub mod session;
pub mod transform;

pub use session::ObservationSession;
