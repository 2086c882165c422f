//! Domain adapters — pluggable per-subject analysis strategies.
//!
//! First matching adapter wins; unmatched observables fall back to a
//! generic, adapter-free message. Adapter faults are caught at the dispatch
//! boundary and reported as `AdapterError`s; the session degrades them to
//! that fallback and never lets them end the session.

pub mod grammar;
pub mod registry;
pub mod safety;
pub mod symbolic;

pub use grammar::SentenceGrammarAdapter;
pub use registry::AdapterRegistry;
pub use symbolic::SymbolicExpressionAdapter;

use sage_core::types::{
    AdapterAnalysis, Observable, ObservationState, StepValidation, TransformationEvent,
    TransformationKind,
};

/// A per-subject analysis strategy.
///
/// Hard invariant: no adapter output may disclose a solved value or a
/// corrected sentence. Guidance is always a question or a "check this"
/// pointer; `safety::sanitize_*` enforces this again after dispatch.
pub trait DomainAdapter: Send + Sync {
    /// Subject tag, e.g. "symbolic-expression".
    fn domain(&self) -> &'static str;

    /// Whether this adapter understands the observable.
    fn can_handle(&self, observable: &Observable) -> bool;

    /// Analyze current content, optionally in light of the change that
    /// produced it.
    fn analyze(
        &self,
        observable: &Observable,
        state: &ObservationState,
        recent_event: Option<&TransformationEvent>,
    ) -> AdapterAnalysis;

    /// Validate the transition from the previous version to the current one.
    fn validate_transition(
        &self,
        prev: &Observable,
        curr: &Observable,
        event: &TransformationEvent,
    ) -> StepValidation;

    /// A Socratic question for the observable's current content.
    fn generate_guided_question(&self, observable: &Observable) -> String;

    /// Domain-nuanced change detection. Defaults to the generic detector.
    fn detect_transformation(&self, before: &str, after: &str) -> Option<TransformationKind> {
        crate::transform::detect_transformation(before, after)
    }
}
