//! Decision-engine value types.

use serde::{Deserialize, Serialize};
use std::fmt;

use sage_core::types::{InterventionKind, MeaningfulEvent, ObservableKind};

/// What the learner appears to be doing, derived externally from motion
/// timing before the controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerIntent {
    WritingInProgress,
    Reading,
    UsingTool,
    Idle,
}

impl LearnerIntent {
    /// Map motion timing onto an intent tag.
    ///
    /// Fresh motion means the pen is moving; a quiet stretch reads as
    /// review; a long one as idle. An open tool panel overrides both quiet
    /// states.
    pub fn derive(motion_detected: bool, ms_since_change: u64, tool_panel_open: bool) -> Self {
        if motion_detected && ms_since_change < 2_000 {
            Self::WritingInProgress
        } else if tool_panel_open {
            Self::UsingTool
        } else if ms_since_change < 10_000 {
            Self::Reading
        } else {
            Self::Idle
        }
    }
}

/// Independent signals that something may be off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoubtReason {
    LowConfidence,
    SignUncertain,
    ResultSuspicious,
    MultipleItems,
    StepIncomplete,
    RepeatedChange,
}

impl DoubtReason {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LowConfidence => "low_confidence",
            Self::SignUncertain => "sign_uncertain",
            Self::ResultSuspicious => "result_suspicious",
            Self::MultipleItems => "multiple_items",
            Self::StepIncomplete => "step_incomplete",
            Self::RepeatedChange => "repeated_change",
        }
    }

    /// Reasons allowed on the audio channel at all. `SignUncertain` is
    /// additionally restricted to its confidence band by the caller.
    pub fn audio_allowed(&self) -> bool {
        matches!(
            self,
            Self::ResultSuspicious | Self::MultipleItems | Self::SignUncertain
        )
    }
}

impl fmt::Display for DoubtReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The controller's output for one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    /// One-line text message, always present.
    pub message: String,
    pub kind: InterventionKind,
    /// Whether the audio channel fires as well.
    pub speak: bool,
    /// Short phrase for the speech sink; set only when `speak` is true.
    pub audio_phrase: Option<String>,
    /// The doubt reason that drove this, when one did.
    pub reason: Option<DoubtReason>,
}

impl Intervention {
    pub fn text_only(message: impl Into<String>, kind: InterventionKind) -> Self {
        Self {
            message: message.into(),
            kind,
            speak: false,
            audio_phrase: None,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: DoubtReason) -> Self {
        self.reason = Some(reason);
        self
    }
}

/// Everything the controller looks at for one cycle. The caller derives
/// intent and collects recent meaningful events before calling `decide`.
#[derive(Debug, Clone)]
pub struct DecisionContext<'a> {
    pub intent: LearnerIntent,
    pub tool_panel_open: bool,
    pub kind: ObservableKind,
    pub content: &'a str,
    pub confidence: f64,
    /// Recognition confidence of the operator glyph, when reported.
    pub sign_confidence: Option<f64>,
    pub recent_events: &'a [MeaningfulEvent],
    /// Whether the capture rectangle has been stable recently.
    pub roi_stable: bool,
    /// Whether this cycle introduced a brand-new observable.
    pub new_observation: bool,
    /// Caller-supplied wall clock, milliseconds.
    pub now_ms: u64,
}
