//! Auto-intervention controller.
//!
//! `decide` is a pure function over a [`DecisionContext`] and an
//! [`InterventionMemory`]; callers own persisting the returned memory
//! between cycles. No clocks, no globals.

pub mod decide;
pub mod memory;
pub mod types;

pub use decide::{decide, Decision};
pub use memory::{DoubtSample, InterventionMemory};
pub use types::{DecisionContext, DoubtReason, Intervention, LearnerIntent};
