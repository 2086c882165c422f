//! Confidence gate — pure function, no internal memory.
//!
//! Any pending/confirmed/denied state machine is the caller's
//! responsibility.

use sage_core::config::EngineConfig;

/// Outcome of gating one sample.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Trustworthy enough to act on autonomously.
    Proceed,
    /// Too uncertain — ask the learner to confirm a content preview.
    ConfirmContent { question: String },
    /// Readable, but an inconsistency was reported — check together.
    CheckTogether { question: String },
}

impl GateOutcome {
    /// True only when the learner must confirm what was read.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::ConfirmContent { .. })
    }

    /// The clarifying question, when one exists.
    pub fn question(&self) -> Option<&str> {
        match self {
            Self::Proceed => None,
            Self::ConfirmContent { question } | Self::CheckTogether { question } => Some(question),
        }
    }
}

/// Gate one sample on (confidence, content, optional detected inconsistency).
pub fn evaluate(
    confidence: f64,
    content: &str,
    inconsistency: Option<&str>,
    config: &EngineConfig,
) -> GateOutcome {
    if confidence < config.effective_confirm_threshold() {
        let preview = preview(content, config.effective_preview_max_chars());
        return GateOutcome::ConfirmContent {
            question: format!("I read this as \"{preview}\" — did I get that right?"),
        };
    }
    if inconsistency.is_some() {
        return GateOutcome::CheckTogether {
            question: "Something here looks worth a second look — shall we check it together?"
                .to_string(),
        };
    }
    GateOutcome::Proceed
}

/// Content preview capped at `max_chars` characters.
fn preview(content: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn low_confidence_requires_confirmation() {
        let outcome = evaluate(0.59, "5×11=55", None, &config());
        assert!(outcome.needs_confirmation());
        assert!(outcome.question().unwrap().contains("5×11=55"));
    }

    #[test]
    fn high_confidence_without_issue_proceeds() {
        let outcome = evaluate(0.95, "5×11=55", None, &config());
        assert_eq!(outcome, GateOutcome::Proceed);
        assert!(!outcome.needs_confirmation());
    }

    #[test]
    fn inconsistency_asks_to_check_together() {
        let outcome = evaluate(0.95, "5×11=56", Some("arithmetic mismatch"), &config());
        assert!(!outcome.needs_confirmation());
        assert!(outcome.question().unwrap().contains("together"));
    }

    #[test]
    fn threshold_is_exclusive_at_the_boundary() {
        assert_eq!(evaluate(0.60, "x", None, &config()), GateOutcome::Proceed);
        assert!(evaluate(0.599, "x", None, &config()).needs_confirmation());
    }

    #[test]
    fn preview_is_capped_at_fifty_chars() {
        let long = "a".repeat(120);
        let outcome = evaluate(0.3, &long, None, &config());
        let question = outcome.question().unwrap().to_string();
        // The embedded preview never exceeds the cap
        let preview_part: String = question
            .split('"')
            .nth(1)
            .unwrap()
            .to_string();
        assert!(preview_part.chars().count() <= 50);
    }
}
