//! Per-cycle analysis value objects: adapter output, step validation, and
//! meaningful events. Transient — not persisted beyond cooldown bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of nudge, if any, an analysis proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    Hint,
    Correction,
    Encouragement,
    None,
}

impl InterventionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hint => "hint",
            Self::Correction => "correction",
            Self::Encouragement => "encouragement",
            Self::None => "none",
        }
    }
}

impl fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a domain adapter's `analyze` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterAnalysis {
    /// Guidance text for the learner. Always a question or a pointer,
    /// never a solved value.
    pub suggestion: Option<String>,
    #[serde(default = "default_intervention_kind")]
    pub intervention: InterventionKind,
    pub next_step: Option<String>,
    pub suggested_tool_id: Option<String>,
}

fn default_intervention_kind() -> InterventionKind {
    InterventionKind::None
}

impl Default for InterventionKind {
    fn default() -> Self {
        Self::None
    }
}

impl AdapterAnalysis {
    /// An analysis with nothing to say.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn hint(suggestion: impl Into<String>) -> Self {
        Self {
            suggestion: Some(suggestion.into()),
            intervention: InterventionKind::Hint,
            next_step: None,
            suggested_tool_id: None,
        }
    }

    pub fn encouragement(suggestion: impl Into<String>) -> Self {
        Self {
            suggestion: Some(suggestion.into()),
            intervention: InterventionKind::Encouragement,
            next_step: None,
            suggested_tool_id: None,
        }
    }

    /// True when there is something worth dispatching.
    pub fn has_message(&self) -> bool {
        self.suggestion.is_some()
    }
}

/// Result of a domain adapter's `validate_transition` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepValidation {
    pub is_valid: bool,
    pub message: Option<String>,
    /// A pointer toward what to re-check — phrased as a question, never the
    /// corrected content itself.
    pub suggested_correction: Option<String>,
}

impl StepValidation {
    pub fn valid() -> Self {
        Self { is_valid: true, message: None, suggested_correction: None }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
            suggested_correction: None,
        }
    }

    pub fn with_correction_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.suggested_correction = Some(pointer.into());
        self
    }
}

/// Human-relevant categories projected from the raw transformation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeaningfulEventKind {
    NewObservation,
    CorrectionDetected,
    AnnotationDetected,
    ClassificationDetected,
    StepCompleted,
}

impl MeaningfulEventKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewObservation => "new_observation",
            Self::CorrectionDetected => "correction_detected",
            Self::AnnotationDetected => "annotation_detected",
            Self::ClassificationDetected => "classification_detected",
            Self::StepCompleted => "step_completed",
        }
    }
}

impl fmt::Display for MeaningfulEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A de-noised summary of one or more raw transformation events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeaningfulEvent {
    pub kind: MeaningfulEventKind,
    pub observable_id: String,
    pub summary: String,
    pub timestamp_ms: u64,
}
