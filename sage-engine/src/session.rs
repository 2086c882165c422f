//! ObservationSession — the per-session orchestrator.
//!
//! One instance exclusively owns one session's state. Synchronous and
//! callback-driven: each `process_snapshot` runs the full pipeline to
//! completion before the next call is accepted. No internal queueing.

use std::sync::Arc;

use tracing::{debug, info};

use sage_core::config::EngineConfig;
use sage_core::errors::{AdapterError, PipelineError, SageErrorCode, SessionError};
use sage_core::events::{
    ErrorEvent, EventDispatcher, FeedbackEvent, InterventionDispatchedEvent,
    ObservableDetectedEvent, RoiSuggestedEvent, SessionEventHandler, SessionStartedEvent,
    SessionStoppedEvent, TransformationRecordedEvent,
};
use sage_core::traits::speech::NullSpeechSink;
use sage_core::traits::SpeechSink;
use sage_core::types::{
    AdapterAnalysis, Bounds, InterventionKind, Observable, ObservationState, StepValidation,
    TransformationEvent, TransformationKind,
};

use crate::adapters::AdapterRegistry;
use crate::classify::classify;
use crate::gate::{self, GateOutcome};
use crate::intervention::{decide, DecisionContext, InterventionMemory, LearnerIntent};
use crate::meaningful;
use crate::roi::RoiTightener;

/// How long the capture rectangle must hold still before doubt-driven
/// interventions may fire.
const ROI_SETTLE_MS: u64 = 3_000;

/// One incoming sample plus the external signals the pipeline needs.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    /// Recognized text for the sampled region.
    pub content: &'a str,
    pub bounds: Bounds,
    pub confidence: f64,
    /// Recognition confidence of the operator glyph, when the provider
    /// reports one.
    pub sign_confidence: Option<f64>,
    pub motion_detected: bool,
    /// Milliseconds since the frame last changed, per the motion signal.
    pub ms_since_change: u64,
    pub tool_panel_open: bool,
    pub now_ms: u64,
}

/// What one `process_snapshot` call did to session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Blank content or inactive session; nothing happened.
    Ignored,
    /// Spatially matched an existing observable with identical content.
    Unchanged,
    /// A new observable was inserted.
    New { observable_id: String },
    /// A matched observable's content changed.
    Transformed {
        observable_id: String,
        kind: TransformationKind,
    },
}

/// Per-session coordinator: classify → match → transform → adapt → gate →
/// project → decide, dispatching events along the way.
pub struct ObservationSession {
    config: EngineConfig,
    registry: AdapterRegistry,
    dispatcher: EventDispatcher,
    speech: Arc<dyn SpeechSink>,
    tightener: RoiTightener,
    state: Option<ObservationState>,
    memory: InterventionMemory,
    roi_changed_ms: u64,
    next_observable: u64,
    next_event: u64,
}

impl ObservationSession {
    pub fn new(config: EngineConfig, registry: AdapterRegistry) -> Self {
        let tightener = RoiTightener::from_config(&config);
        Self {
            config,
            registry,
            dispatcher: EventDispatcher::new(),
            speech: Arc::new(NullSpeechSink),
            tightener,
            state: None,
            memory: InterventionMemory::new(),
            roi_changed_ms: 0,
            next_observable: 0,
            next_event: 0,
        }
    }

    /// Register a host event sink. Handlers run synchronously, in
    /// registration order, with panic isolation.
    pub fn register_handler(&mut self, handler: Arc<dyn SessionEventHandler>) {
        self.dispatcher.register(handler);
    }

    /// Install the speech channel. Defaults to a sink that swallows phrases.
    pub fn set_speech_sink(&mut self, sink: Arc<dyn SpeechSink>) {
        self.speech = sink;
    }

    /// Start a session. Fails if one is already active.
    pub fn initialize(
        &mut self,
        session_id: impl Into<String>,
        roi_bounds: Bounds,
        now_ms: u64,
    ) -> Result<(), SessionError> {
        if let Some(state) = &self.state {
            if state.is_active {
                return Err(SessionError::AlreadyActive(state.session_id.clone()));
            }
        }
        let session_id = session_id.into();
        self.state = Some(ObservationState::new(session_id.clone(), roi_bounds, now_ms));
        self.memory = InterventionMemory::new();
        self.roi_changed_ms = now_ms;
        info!(%session_id, "observation session started");
        self.dispatcher
            .emit_session_started(&SessionStartedEvent { session_id, roi_bounds });
        Ok(())
    }

    /// Run one sample through the full pipeline.
    ///
    /// Blank content and inactive sessions are ignored without error, per
    /// the rejected-input policy; calling before `initialize` is a caller
    /// bug and fails.
    pub fn process_snapshot(&mut self, snapshot: Snapshot<'_>) -> Result<SnapshotOutcome, SessionError> {
        if self.state.is_none() {
            self.report_error(PipelineError::Session(SessionError::NotInitialized));
            return Err(SessionError::NotInitialized);
        }
        let content = snapshot.content.trim().to_string();
        {
            let state = match self.state.as_mut() {
                Some(state) => state,
                None => return Err(SessionError::NotInitialized),
            };
            if !state.is_active || content.is_empty() {
                debug!("snapshot ignored (inactive or blank)");
                return Ok(SnapshotOutcome::Ignored);
            }
            state.last_snapshot_ms = snapshot.now_ms;
            state.motion_detected = snapshot.motion_detected;
        }

        let kind = classify(&content);
        let epsilon = self.config.effective_spatial_epsilon();
        // First match wins in insertion order, not map order
        let matched_id = self.state.as_ref().and_then(|state| {
            state
                .observables_in_order()
                .find(|o| o.bounds.matches(&snapshot.bounds, epsilon))
                .map(|o| o.id.clone())
        });

        let confident = snapshot.confidence >= self.config.effective_confirm_threshold();

        let (outcome, current, analysis, validation) = match matched_id {
            None => self.admit_new(kind, &content, &snapshot, confident),
            Some(id) => match self.apply_change(&id, kind, &content, &snapshot, confident) {
                Some(result) => result,
                // Matched with identical content: no event and no feedback,
                // but the cycle still reaches the controller below so its
                // doubt window and fingerprint stay current
                None => {
                    let current = match self
                        .state
                        .as_ref()
                        .and_then(|s| s.observables.get(&id))
                    {
                        Some(observable) => observable.clone(),
                        None => return Ok(SnapshotOutcome::Unchanged),
                    };
                    (
                        SnapshotOutcome::Unchanged,
                        current,
                        AdapterAnalysis::silent(),
                        None,
                    )
                }
            },
        };
        let unchanged = outcome == SnapshotOutcome::Unchanged;

        let projection = {
            let state = match self.state.as_ref() {
                Some(state) => state,
                None => return Err(SessionError::NotInitialized),
            };
            meaningful::project(
                state.recent_transformations(self.config.effective_meaningful_window()),
            )
        };

        if !unchanged {
            // Confidence gate: a clarifying question replaces autonomous
            // guidance
            let inconsistency = validation
                .as_ref()
                .filter(|v| !v.is_valid)
                .map(|_| "step validation failed");
            let gate_outcome =
                gate::evaluate(snapshot.confidence, &content, inconsistency, &self.config);

            let message = match &gate_outcome {
                GateOutcome::Proceed => analysis.suggestion.clone(),
                other => other.question().map(str::to_string),
            };
            let failed_validation = validation.as_ref().is_some_and(|v| !v.is_valid);
            if message.is_some() || failed_validation {
                let intervention = match &gate_outcome {
                    GateOutcome::Proceed => analysis.intervention,
                    _ => InterventionKind::Hint,
                };
                self.dispatcher.emit_feedback(&FeedbackEvent {
                    message: message.unwrap_or_default(),
                    intervention,
                    suggested_tool_id: analysis.suggested_tool_id.clone(),
                    validation: validation.clone(),
                    meaningful_events: projection.events.clone(),
                    needs_confirmation: gate_outcome.needs_confirmation(),
                });
            }
        }

        // Auto-intervention pass over the same cycle
        let intent = LearnerIntent::derive(
            snapshot.motion_detected,
            snapshot.ms_since_change,
            snapshot.tool_panel_open,
        );
        let ctx = DecisionContext {
            intent,
            tool_panel_open: snapshot.tool_panel_open,
            kind: current.kind,
            content: &content,
            confidence: snapshot.confidence,
            sign_confidence: snapshot.sign_confidence,
            recent_events: &projection.events,
            roi_stable: snapshot.now_ms.saturating_sub(self.roi_changed_ms) >= ROI_SETTLE_MS,
            new_observation: matches!(outcome, SnapshotOutcome::New { .. }),
            now_ms: snapshot.now_ms,
        };
        let decision = decide(&ctx, &self.memory, &self.config);
        self.memory = decision.memory;
        if let Some(intervention) = decision.intervention {
            info!(
                reason = intervention.reason.map(|r| r.name()),
                speak = intervention.speak,
                "intervention dispatched"
            );
            if let Some(phrase) = &intervention.audio_phrase {
                self.speech.speak(phrase);
            }
            self.dispatcher.emit_intervention(&InterventionDispatchedEvent {
                message: intervention.message,
                speak: intervention.speak,
                audio_phrase: intervention.audio_phrase,
                reason: intervention.reason.map(|r| r.name().to_string()),
            });
        }

        Ok(outcome)
    }

    /// Steps 3–4 of the pipeline for an unmatched sample.
    fn admit_new(
        &mut self,
        kind: sage_core::types::ObservableKind,
        content: &str,
        snapshot: &Snapshot<'_>,
        confident: bool,
    ) -> (SnapshotOutcome, Observable, AdapterAnalysis, Option<StepValidation>) {
        self.next_observable += 1;
        let id = format!("obs-{}", self.next_observable);
        let observable = Observable::new(
            id.clone(),
            kind,
            content,
            snapshot.bounds,
            snapshot.confidence,
            snapshot.now_ms,
        );

        self.next_event += 1;
        let event = TransformationEvent::new(
            format!("evt-{}", self.next_event),
            TransformationKind::Add,
            &id,
            kind,
            snapshot.now_ms,
            "",
            content,
            snapshot.bounds,
        );

        let (analysis, fault) = {
            let state = match self.state.as_mut() {
                Some(state) => state,
                None => {
                    return (SnapshotOutcome::Ignored, observable, AdapterAnalysis::silent(), None)
                }
            };
            state.insert_observable(observable.clone());
            state.transformations.push(event);
            // Low-confidence samples bypass domain adapters entirely
            if confident {
                match self.registry.analyze(&observable, state, None) {
                    Ok(analysis) => (analysis, None),
                    Err(err) => (AdapterRegistry::fallback_analysis(), Some(err)),
                }
            } else {
                (AdapterAnalysis::silent(), None)
            }
        };
        if let Some(err) = fault {
            self.report_adapter_fault(err);
        }

        self.dispatcher.emit_observable_detected(&ObservableDetectedEvent {
            observable_id: id.clone(),
            kind,
            content_preview: preview(content, self.config.effective_preview_max_chars()),
            confidence: snapshot.confidence,
        });

        (
            SnapshotOutcome::New { observable_id: id },
            observable,
            analysis,
            None,
        )
    }

    /// Step 6 of the pipeline for a matched sample whose content changed.
    /// Returns `None` for identical content.
    fn apply_change(
        &mut self,
        id: &str,
        kind: sage_core::types::ObservableKind,
        content: &str,
        snapshot: &Snapshot<'_>,
        confident: bool,
    ) -> Option<(SnapshotOutcome, Observable, AdapterAnalysis, Option<StepValidation>)> {
        let prev = self.state.as_ref()?.observables.get(id)?.clone();
        if prev.content == content {
            return None;
        }

        let detected = self
            .registry
            .detect_transformation(&prev, &prev.content, content)?;

        let mut current = prev.replaced_with(content, snapshot.confidence);
        let reclassified = kind != prev.kind;
        if reclassified {
            current.kind = kind;
        }

        self.next_event += 1;
        let event = TransformationEvent::new(
            format!("evt-{}", self.next_event),
            detected,
            id,
            current.kind,
            snapshot.now_ms,
            &prev.content,
            content,
            snapshot.bounds,
        );

        let (analysis, validation, faults) = {
            let state = self.state.as_mut()?;
            state.transformations.push(event.clone());
            if reclassified {
                self.next_event += 1;
                state.transformations.push(TransformationEvent::new(
                    format!("evt-{}", self.next_event),
                    TransformationKind::Classify,
                    id,
                    current.kind,
                    snapshot.now_ms,
                    &prev.content,
                    content,
                    snapshot.bounds,
                ));
            }
            state.observables.insert(id.to_string(), current.clone());
            state.current_step += 1;
            if confident {
                let mut faults = Vec::new();
                let analysis = match self.registry.analyze(&current, state, Some(&event)) {
                    Ok(analysis) => analysis,
                    Err(err) => {
                        faults.push(err);
                        AdapterRegistry::fallback_analysis()
                    }
                };
                let validation = match self.registry.validate_transition(&prev, &current, &event) {
                    Ok(validation) => Some(validation),
                    Err(err) => {
                        faults.push(err);
                        // A faulting validator never blocks the pipeline
                        Some(StepValidation::valid())
                    }
                };
                (analysis, validation, faults)
            } else {
                (AdapterAnalysis::silent(), None, Vec::new())
            }
        };
        for err in faults {
            self.report_adapter_fault(err);
        }

        self.dispatcher.emit_transformation_recorded(&TransformationRecordedEvent {
            event_id: event.id.clone(),
            observable_id: id.to_string(),
            kind: detected,
        });

        Some((
            SnapshotOutcome::Transformed {
                observable_id: id.to_string(),
                kind: detected,
            },
            current,
            analysis,
            validation,
        ))
    }

    /// Replace the monitored rectangle. Resets ROI stability.
    pub fn update_roi_bounds(&mut self, bounds: Bounds, now_ms: u64) -> Result<(), SessionError> {
        let state = self.state.as_mut().ok_or(SessionError::NotInitialized)?;
        if !state.is_active {
            return Err(SessionError::Inactive);
        }
        state.roi_bounds = bounds;
        self.roi_changed_ms = now_ms;
        debug!("roi bounds updated");
        Ok(())
    }

    /// Propose a tighter capture rectangle around a dark-pixel bounding box.
    /// Emits `on_roi_suggested` when the heuristic fires.
    pub fn suggest_roi(&self, dark_bbox: &Bounds, confidence: f64) -> Option<Bounds> {
        let state = self.state.as_ref()?;
        let suggested = self
            .tightener
            .suggest(&state.roi_bounds, dark_bbox, confidence)?;
        self.dispatcher
            .emit_roi_suggested(&RoiSuggestedEvent { bounds: suggested });
        Some(suggested)
    }

    /// Freeze the session. Discards transient caches; the state itself stays
    /// readable until `reset` or a new `initialize`.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        let state = self.state.as_mut().ok_or(SessionError::NotInitialized)?;
        if !state.is_active {
            return Err(SessionError::Inactive);
        }
        state.is_active = false;
        self.memory = self.memory.cleared();
        self.speech.cancel();
        info!(session_id = %state.session_id, "observation session stopped");
        self.dispatcher.emit_session_stopped(&SessionStoppedEvent {
            session_id: state.session_id.clone(),
            observable_count: state.observables.len(),
            transformation_count: state.transformations.len(),
        });
        Ok(())
    }

    /// Restart the current session in place: same id and ROI, empty state.
    pub fn reset(&mut self, now_ms: u64) -> Result<(), SessionError> {
        let state = self.state.as_ref().ok_or(SessionError::NotInitialized)?;
        let session_id = state.session_id.clone();
        let roi_bounds = state.roi_bounds;
        self.state = Some(ObservationState::new(session_id.clone(), roi_bounds, now_ms));
        self.memory = InterventionMemory::new();
        self.roi_changed_ms = now_ms;
        info!(%session_id, "observation session reset");
        // A reset is a restart as far as sinks are concerned
        self.dispatcher
            .emit_session_started(&SessionStartedEvent { session_id, roi_bounds });
        Ok(())
    }

    /// Read-only view of the session state, if initialized.
    pub fn state(&self) -> Option<&ObservationState> {
        self.state.as_ref()
    }

    /// Surface a non-fatal pipeline error to host sinks with its stable code.
    fn report_error(&self, err: PipelineError) {
        self.dispatcher.emit_error(&ErrorEvent {
            message: err.to_string(),
            error_code: err.error_code().to_string(),
        });
    }

    fn report_adapter_fault(&self, err: AdapterError) {
        self.report_error(PipelineError::Adapter(err));
    }
}

fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        content.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        feedback: Mutex<Vec<FeedbackEvent>>,
        interventions: Mutex<Vec<InterventionDispatchedEvent>>,
        detected: Mutex<Vec<ObservableDetectedEvent>>,
        stopped: Mutex<Vec<SessionStoppedEvent>>,
        errors: Mutex<Vec<ErrorEvent>>,
    }

    impl SessionEventHandler for Recorder {
        fn on_feedback(&self, event: &FeedbackEvent) {
            self.feedback.lock().unwrap().push(event.clone());
        }
        fn on_intervention(&self, event: &InterventionDispatchedEvent) {
            self.interventions.lock().unwrap().push(event.clone());
        }
        fn on_observable_detected(&self, event: &ObservableDetectedEvent) {
            self.detected.lock().unwrap().push(event.clone());
        }
        fn on_session_stopped(&self, event: &SessionStoppedEvent) {
            self.stopped.lock().unwrap().push(event.clone());
        }
        fn on_error(&self, event: &ErrorEvent) {
            self.errors.lock().unwrap().push(event.clone());
        }
    }

    struct ExplodingAdapter;

    impl crate::adapters::DomainAdapter for ExplodingAdapter {
        fn domain(&self) -> &'static str {
            "exploding"
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

    fn session_with(recorder: Arc<Recorder>) -> ObservationSession {
        let mut session = ObservationSession::new(EngineConfig::default(), AdapterRegistry::with_defaults());
        session.register_handler(recorder);
        session.initialize("s1", Bounds::full(), 0).unwrap();
        session
    }

    fn snapshot(content: &str, confidence: f64, now_ms: u64) -> Snapshot<'_> {
        Snapshot {
            content,
            bounds: Bounds::new(0.2, 0.2, 0.4, 0.1),
            confidence,
            sign_confidence: None,
            motion_detected: false,
            ms_since_change: 5_000,
            tool_panel_open: false,
            now_ms,
        }
    }

    #[test]
    fn double_initialize_is_rejected() {
        let mut session = session_with(Arc::new(Recorder::default()));
        let err = session.initialize("s2", Bounds::full(), 0).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyActive(_)));
    }

    #[test]
    fn blank_content_is_ignored_without_events() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        let outcome = session.process_snapshot(snapshot("   ", 0.9, 100)).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Ignored);
        assert!(recorder.detected.lock().unwrap().is_empty());
        assert!(session.state().unwrap().transformations.is_empty());
    }

    #[test]
    fn uninitialized_session_is_a_caller_bug() {
        let mut session =
            ObservationSession::new(EngineConfig::default(), AdapterRegistry::with_defaults());
        let err = session.process_snapshot(snapshot("x", 0.9, 0)).unwrap_err();
        assert!(matches!(err, SessionError::NotInitialized));
    }

    #[test]
    fn new_sample_inserts_and_notifies() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        let outcome = session.process_snapshot(snapshot("5×11=55", 0.9, 100)).unwrap();
        assert!(matches!(outcome, SnapshotOutcome::New { .. }));
        assert_eq!(recorder.detected.lock().unwrap().len(), 1);
        let state = session.state().unwrap();
        assert_eq!(state.observables.len(), 1);
        assert_eq!(state.transformations.len(), 1);
        assert_eq!(state.transformations[0].kind, TransformationKind::Add);
    }

    #[test]
    fn unchanged_content_never_appends_an_event() {
        let mut session = session_with(Arc::new(Recorder::default()));
        session.process_snapshot(snapshot("5×11=55", 0.9, 100)).unwrap();
        let before = session.state().unwrap().transformations.len();
        let outcome = session.process_snapshot(snapshot("5×11=55", 0.9, 200)).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Unchanged);
        assert_eq!(session.state().unwrap().transformations.len(), before);
    }

    #[test]
    fn corrected_result_is_flagged_without_disclosure() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        session.process_snapshot(snapshot("5×11=55", 0.9, 100)).unwrap();
        let outcome = session.process_snapshot(snapshot("5×11=56", 0.9, 5_000)).unwrap();
        assert!(matches!(
            outcome,
            SnapshotOutcome::Transformed { kind: TransformationKind::Replace, .. }
        ));

        let feedback = recorder.feedback.lock().unwrap();
        let last = feedback.last().unwrap();
        let validation = last.validation.clone().unwrap();
        assert!(!validation.is_valid);
        assert!(!last.message.contains("55"));
        assert!(!last.message.contains("56"));
        let message = validation.message.unwrap();
        assert!(!message.contains("55"));
        assert!(!message.contains("56"));
    }

    #[test]
    fn low_confidence_asks_for_confirmation() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        session.process_snapshot(snapshot("5×11=55", 0.59, 100)).unwrap();
        let feedback = recorder.feedback.lock().unwrap();
        assert!(feedback.last().unwrap().needs_confirmation);
        assert!(feedback.last().unwrap().message.contains("5×11=55"));
    }

    #[test]
    fn high_confidence_clean_line_needs_no_confirmation() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        session.process_snapshot(snapshot("5×11=55", 0.95, 100)).unwrap();
        for event in recorder.feedback.lock().unwrap().iter() {
            assert!(!event.needs_confirmation);
        }
    }

    #[test]
    fn stop_freezes_the_session() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        session.process_snapshot(snapshot("5×11=55", 0.9, 100)).unwrap();
        session.stop().unwrap();
        assert_eq!(recorder.stopped.lock().unwrap().len(), 1);
        assert_eq!(recorder.stopped.lock().unwrap()[0].observable_count, 1);

        let outcome = session.process_snapshot(snapshot("7×8=56", 0.9, 200)).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Ignored);
        assert!(matches!(session.stop().unwrap_err(), SessionError::Inactive));
    }

    #[test]
    fn reset_clears_state_but_keeps_identity() {
        let mut session = session_with(Arc::new(Recorder::default()));
        session.process_snapshot(snapshot("5×11=55", 0.9, 100)).unwrap();
        session.reset(500).unwrap();
        let state = session.state().unwrap();
        assert_eq!(state.session_id, "s1");
        assert!(state.observables.is_empty());
        assert!(state.is_active);
    }

    #[test]
    fn ambiguous_spatial_match_goes_to_the_first_inserted() {
        let mut session = session_with(Arc::new(Recorder::default()));
        let mut first = snapshot("5×11=55", 0.9, 100);
        first.bounds = Bounds::new(0.10, 0.2, 0.4, 0.1);
        let first_id = match session.process_snapshot(first).unwrap() {
            SnapshotOutcome::New { observable_id } => observable_id,
            other => panic!("expected a new observable, got {other:?}"),
        };
        let mut second = snapshot("7×8=56", 0.9, 200);
        second.bounds = Bounds::new(0.26, 0.2, 0.4, 0.1);
        assert!(matches!(
            session.process_snapshot(second).unwrap(),
            SnapshotOutcome::New { .. }
        ));

        // Midway between the two slots: within epsilon of both
        let mut midway = snapshot("5×11=56", 0.9, 300);
        midway.bounds = Bounds::new(0.18, 0.2, 0.4, 0.1);
        match session.process_snapshot(midway).unwrap() {
            SnapshotOutcome::Transformed { observable_id, .. } => {
                assert_eq!(observable_id, first_id);
            }
            other => panic!("expected a transformation, got {other:?}"),
        }
    }

    #[test]
    fn static_cycles_keep_the_doubt_window_current() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder.clone());
        session.process_snapshot(snapshot("5×11=56", 0.9, 0)).unwrap();
        let after_first = recorder.feedback.lock().unwrap().len();

        // Same content, same confidence: no event, no feedback, but the
        // cycle's doubt sample still lands in the rolling window
        let outcome = session.process_snapshot(snapshot("5×11=56", 0.9, 20_000)).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Unchanged);
        assert_eq!(recorder.feedback.lock().unwrap().len(), after_first);

        // The suspicious line was seen in 2 of the last 3 snapshots, so a
        // subsequent change may act on it
        session.process_snapshot(snapshot("9+9=18", 0.9, 40_000)).unwrap();
        let interventions = recorder.interventions.lock().unwrap();
        assert!(interventions
            .iter()
            .any(|i| i.reason.as_deref() == Some("result_suspicious")));
    }

    #[test]
    fn adapter_fault_is_surfaced_and_degrades_to_fallback() {
        let recorder = Arc::new(Recorder::default());
        let mut registry = AdapterRegistry::empty();
        registry.register(Box::new(ExplodingAdapter));
        let mut session = ObservationSession::new(EngineConfig::default(), registry);
        session.register_handler(recorder.clone());
        session.initialize("s1", Bounds::full(), 0).unwrap();

        session.process_snapshot(snapshot("5×11=56", 0.9, 100)).unwrap();

        let errors = recorder.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_code, "SAGE_ADAPTER_PANICKED");
        // Guidance still went out, via the generic fallback
        let feedback = recorder.feedback.lock().unwrap();
        assert!(!feedback.is_empty());
        assert!(!feedback[0].message.is_empty());
    }

    #[test]
    fn distinct_positions_become_distinct_observables() {
        let mut session = session_with(Arc::new(Recorder::default()));
        session.process_snapshot(snapshot("5×11=55", 0.9, 100)).unwrap();
        let mut far = snapshot("The dog runs fast.", 0.9, 200);
        far.bounds = Bounds::new(0.2, 0.7, 0.4, 0.1);
        session.process_snapshot(far).unwrap();
        assert_eq!(session.state().unwrap().observables.len(), 2);
    }

    #[test]
    fn suggest_roi_uses_the_session_rectangle() {
        let recorder = Arc::new(Recorder::default());
        let mut session = session_with(recorder);
        session.update_roi_bounds(Bounds::full(), 0).unwrap();
        let bbox = Bounds::new(0.3, 0.3, 0.6, 0.5);
        assert!(session.suggest_roi(&bbox, 0.8).is_some());
        assert!(session.suggest_roi(&bbox, 0.5).is_none());
    }
}
