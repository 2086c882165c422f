//! Adapter registry — first-match dispatch with fault isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use sage_core::errors::AdapterError;
use sage_core::types::{
    AdapterAnalysis, InterventionKind, Observable, ObservationState, StepValidation,
    TransformationEvent, TransformationKind,
};

use super::safety;
use super::{DomainAdapter, SentenceGrammarAdapter, SymbolicExpressionAdapter};

/// Generic message used when no adapter matches or an adapter faults.
const GENERIC_GUIDANCE: &str = "Want to talk through what you're working on?";

/// Explicit, injected registry of domain adapters. First matching adapter
/// wins. A throwing adapter degrades to the generic fallback path.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn DomainAdapter>>,
}

impl AdapterRegistry {
    /// An empty registry; every observable takes the fallback path.
    pub fn empty() -> Self {
        Self { adapters: Vec::new() }
    }

    /// The two reference adapters, symbolic first.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(SymbolicExpressionAdapter));
        registry.register(Box::new(SentenceGrammarAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Box<dyn DomainAdapter>) {
        self.adapters.push(adapter);
    }

    pub fn adapter_count(&self) -> usize {
        self.adapters.len()
    }

    /// First adapter claiming the observable. A panicking `can_handle` is
    /// treated as a non-match.
    fn find(&self, observable: &Observable) -> Option<&dyn DomainAdapter> {
        self.adapters.iter().map(|a| a.as_ref()).find(|adapter| {
            catch_unwind(AssertUnwindSafe(|| adapter.can_handle(observable))).unwrap_or_else(
                |_| {
                    warn!(domain = adapter.domain(), "adapter panicked in can_handle");
                    false
                },
            )
        })
    }

    /// The generic, adapter-free analysis.
    pub fn fallback_analysis() -> AdapterAnalysis {
        AdapterAnalysis {
            suggestion: Some(GENERIC_GUIDANCE.to_string()),
            intervention: InterventionKind::Hint,
            next_step: None,
            suggested_tool_id: None,
        }
    }

    /// Analyze through the matching adapter, sanitized. An unmatched
    /// observable gets the generic fallback; a panicking or malformed
    /// adapter is reported so the caller can degrade and notify.
    pub fn analyze(
        &self,
        observable: &Observable,
        state: &ObservationState,
        recent_event: Option<&TransformationEvent>,
    ) -> Result<AdapterAnalysis, AdapterError> {
        let Some(adapter) = self.find(observable) else {
            return Ok(Self::fallback_analysis());
        };
        let result = catch_unwind(AssertUnwindSafe(|| {
            adapter.analyze(observable, state, recent_event)
        }));
        let analysis = match result {
            Ok(analysis) => safety::sanitize_analysis(analysis),
            Err(_) => {
                warn!(domain = adapter.domain(), "adapter panicked in analyze");
                return Err(AdapterError::Panicked {
                    domain: adapter.domain().to_string(),
                    operation: "analyze",
                });
            }
        };
        if analysis.suggestion.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(AdapterError::Malformed {
                domain: adapter.domain().to_string(),
                detail: "blank suggestion".to_string(),
            });
        }
        Ok(analysis)
    }

    /// Validate a transition through the matching adapter, sanitized. Faults
    /// are reported; callers treat the step as valid rather than blocking
    /// the pipeline.
    pub fn validate_transition(
        &self,
        prev: &Observable,
        curr: &Observable,
        event: &TransformationEvent,
    ) -> Result<StepValidation, AdapterError> {
        let Some(adapter) = self.find(curr) else {
            return Ok(StepValidation::valid());
        };
        let result = catch_unwind(AssertUnwindSafe(|| {
            adapter.validate_transition(prev, curr, event)
        }));
        match result {
            Ok(validation) => Ok(safety::sanitize_validation(validation)),
            Err(_) => {
                warn!(domain = adapter.domain(), "adapter panicked in validate_transition");
                Err(AdapterError::Panicked {
                    domain: adapter.domain().to_string(),
                    operation: "validate_transition",
                })
            }
        }
    }

    /// Guided question through the matching adapter, sanitized.
    pub fn guided_question(&self, observable: &Observable) -> String {
        let Some(adapter) = self.find(observable) else {
            return GENERIC_GUIDANCE.to_string();
        };
        let result = catch_unwind(AssertUnwindSafe(|| adapter.generate_guided_question(observable)));
        match result {
            Ok(question) => safety::sanitize_guidance(&question),
            Err(_) => GENERIC_GUIDANCE.to_string(),
        }
    }

    /// Change detection through the matching adapter, falling back to the
    /// generic detector on non-match or fault.
    pub fn detect_transformation(
        &self,
        observable: &Observable,
        before: &str,
        after: &str,
    ) -> Option<TransformationKind> {
        let Some(adapter) = self.find(observable) else {
            return crate::transform::detect_transformation(before, after);
        };
        catch_unwind(AssertUnwindSafe(|| adapter.detect_transformation(before, after)))
            .unwrap_or_else(|_| {
                warn!(domain = adapter.domain(), "adapter panicked in detect_transformation");
                crate::transform::detect_transformation(before, after)
            })
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::types::{Bounds, ObservableKind};

    struct FaultyAdapter;

    impl DomainAdapter for FaultyAdapter {
        fn domain(&self) -> &'static str {
            "faulty"
        }
        fn can_handle(&self, _observable: &Observable) -> bool {
            true
        }
        fn analyze(
            &self,
            _observable: &Observable,
            _state: &ObservationState,
            _recent_event: Option<&TransformationEvent>,
        ) -> AdapterAnalysis {
            panic!("adapter bug");
        }
        fn validate_transition(
            &self,
            _prev: &Observable,
            _curr: &Observable,
            _event: &TransformationEvent,
        ) -> StepValidation {
            panic!("adapter bug");
        }
        fn generate_guided_question(&self, _observable: &Observable) -> String {
            panic!("adapter bug");
        }
    }

    struct DisclosingAdapter;

    impl DomainAdapter for DisclosingAdapter {
        fn domain(&self) -> &'static str {
            "disclosing"
        }
        fn can_handle(&self, _observable: &Observable) -> bool {
            true
        }
        fn analyze(
            &self,
            _observable: &Observable,
            _state: &ObservationState,
            _recent_event: Option<&TransformationEvent>,
        ) -> AdapterAnalysis {
            AdapterAnalysis::hint("The answer is 55")
        }
        fn validate_transition(
            &self,
            _prev: &Observable,
            _curr: &Observable,
            _event: &TransformationEvent,
        ) -> StepValidation {
            StepValidation::invalid("You should write 55 here")
        }
        fn generate_guided_question(&self, _observable: &Observable) -> String {
            "The correct answer is 55".to_string()
        }
    }

    fn observable(content: &str) -> Observable {
        Observable::new(
            "o1",
            ObservableKind::SymbolicExpression,
            content,
            Bounds::full(),
            0.9,
            0,
        )
    }

    fn state() -> ObservationState {
        ObservationState::new("s1", Bounds::full(), 0)
    }

    fn replace_event(obs: &Observable) -> TransformationEvent {
        TransformationEvent::new(
            "t1",
            TransformationKind::Replace,
            &obs.id,
            obs.kind,
            0,
            "",
            &obs.content,
            obs.bounds,
        )
    }

    struct BlankAdapter;

    impl DomainAdapter for BlankAdapter {
        fn domain(&self) -> &'static str {
            "blank"
        }
        fn can_handle(&self, _observable: &Observable) -> bool {
            true
        }
        fn analyze(
            &self,
            _observable: &Observable,
            _state: &ObservationState,
            _recent_event: Option<&TransformationEvent>,
        ) -> AdapterAnalysis {
            AdapterAnalysis::hint("   ")
        }
        fn validate_transition(
            &self,
            _prev: &Observable,
            _curr: &Observable,
            _event: &TransformationEvent,
        ) -> StepValidation {
            StepValidation::valid()
        }
        fn generate_guided_question(&self, _observable: &Observable) -> String {
            String::new()
        }
    }

    #[test]
    fn panicking_adapter_is_reported_not_propagated() {
        use sage_core::errors::SageErrorCode;

        let mut registry = AdapterRegistry::empty();
        registry.register(Box::new(FaultyAdapter));
        let obs = observable("5×11=56");
        let err = registry.analyze(&obs, &state(), None).unwrap_err();
        assert!(matches!(err, AdapterError::Panicked { .. }));
        assert_eq!(err.error_code(), "SAGE_ADAPTER_PANICKED");

        let err = registry
            .validate_transition(&obs, &obs, &replace_event(&obs))
            .unwrap_err();
        assert!(matches!(err, AdapterError::Panicked { .. }));
    }

    #[test]
    fn blank_suggestion_is_malformed_output() {
        let mut registry = AdapterRegistry::empty();
        registry.register(Box::new(BlankAdapter));
        let obs = observable("5×11=56");
        let err = registry.analyze(&obs, &state(), None).unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { .. }));
    }

    #[test]
    fn empty_registry_falls_back() {
        let registry = AdapterRegistry::empty();
        let obs = observable("anything");
        let analysis = registry.analyze(&obs, &state(), None).unwrap();
        assert!(analysis.has_message());
    }

    #[test]
    fn disclosing_output_is_rewritten_before_dispatch() {
        let mut registry = AdapterRegistry::empty();
        registry.register(Box::new(DisclosingAdapter));
        let obs = observable("5×11=56");

        let analysis = registry.analyze(&obs, &state(), None).unwrap();
        assert_eq!(analysis.suggestion.as_deref(), Some(safety::SOCRATIC_FALLBACK));

        let validation = registry
            .validate_transition(&obs, &obs, &replace_event(&obs))
            .unwrap();
        assert_eq!(validation.message.as_deref(), Some(safety::SOCRATIC_FALLBACK));

        assert_eq!(registry.guided_question(&obs), safety::SOCRATIC_FALLBACK);
    }

    #[test]
    fn first_matching_adapter_wins() {
        let registry = AdapterRegistry::with_defaults();
        let obs = observable("5×11=56");
        let analysis = registry.analyze(&obs, &state(), None).unwrap();
        // The symbolic adapter, not the fallback, produced this
        assert!(analysis.suggestion.unwrap().contains("5 × 11"));
    }
}
