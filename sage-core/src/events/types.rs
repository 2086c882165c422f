//! Event payload types delivered to the host UI and speech layers.

use crate::types::{
    Bounds, InterventionKind, MeaningfulEvent, ObservableKind, StepValidation, TransformationKind,
};

/// Payload for `on_session_started`.
#[derive(Debug, Clone)]
pub struct SessionStartedEvent {
    pub session_id: String,
    pub roi_bounds: Bounds,
}

/// Payload for `on_session_stopped`.
#[derive(Debug, Clone)]
pub struct SessionStoppedEvent {
    pub session_id: String,
    pub observable_count: usize,
    pub transformation_count: usize,
}

/// Payload for `on_observable_detected`.
#[derive(Debug, Clone)]
pub struct ObservableDetectedEvent {
    pub observable_id: String,
    pub kind: ObservableKind,
    pub content_preview: String,
    pub confidence: f64,
}

/// Payload for `on_transformation_recorded`.
#[derive(Debug, Clone)]
pub struct TransformationRecordedEvent {
    pub event_id: String,
    pub observable_id: String,
    pub kind: TransformationKind,
}

/// Payload for `on_feedback` — the UI sink of the pipeline.
/// Dispatched only when there is a concrete message or a failed validation.
#[derive(Debug, Clone)]
pub struct FeedbackEvent {
    pub message: String,
    pub intervention: InterventionKind,
    pub suggested_tool_id: Option<String>,
    pub validation: Option<StepValidation>,
    pub meaningful_events: Vec<MeaningfulEvent>,
    /// True when the confidence gate replaced guidance with a clarifying
    /// question the learner must answer first.
    pub needs_confirmation: bool,
}

/// Payload for `on_intervention` — the auto-intervention decision output.
#[derive(Debug, Clone)]
pub struct InterventionDispatchedEvent {
    pub message: String,
    pub speak: bool,
    pub audio_phrase: Option<String>,
    pub reason: Option<String>,
}

/// Payload for `on_roi_suggested`.
#[derive(Debug, Clone)]
pub struct RoiSuggestedEvent {
    pub bounds: Bounds,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
