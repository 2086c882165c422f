//! Sentence-grammar adapter — flags mechanics, never rewrites the sentence.

use std::sync::OnceLock;

use regex::Regex;

use sage_core::types::{
    AdapterAnalysis, Observable, ObservableKind, ObservationState, StepValidation,
    TransformationEvent, TransformationKind,
};

use super::DomainAdapter;

/// Mechanics a sentence can get wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarIssue {
    MissingCapital,
    MissingTerminal,
    NoVerb,
    SpacingAnomaly,
}

impl GrammarIssue {
    /// Guidance is a question about the issue, never the fixed sentence.
    fn question(&self) -> &'static str {
        match self {
            Self::MissingCapital => "How do written sentences usually begin?",
            Self::MissingTerminal => "What shows a reader that your sentence has ended?",
            Self::NoVerb => "Which word in your sentence carries the action?",
            Self::SpacingAnomaly => "Check the spacing — is there a gap that shouldn't be there?",
        }
    }
}

fn verb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\b(is|are|was|were|be|been|am|has|have|had|do|does|did|can|will|would|went|go|goes|see|saw|say|said|run|ran)\b|\b[a-z]{3,}(ing|ed|es|s)\b",
        )
        .expect("static regex")
    })
}

fn spacing_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S  +\S|\s+[.,!?]").expect("static regex"))
}

/// Scan a sentence for mechanical issues, in report order.
pub fn scan_issues(content: &str) -> Vec<GrammarIssue> {
    let trimmed = content.trim();
    let mut issues = Vec::new();
    if !trimmed.chars().next().is_some_and(|c| c.is_uppercase()) {
        issues.push(GrammarIssue::MissingCapital);
    }
    if !trimmed.ends_with(['.', '!', '?']) {
        issues.push(GrammarIssue::MissingTerminal);
    }
    if !verb_pattern().is_match(trimmed) {
        issues.push(GrammarIssue::NoVerb);
    }
    if spacing_pattern().is_match(trimmed) {
        issues.push(GrammarIssue::SpacingAnomaly);
    }
    issues
}

/// Reference adapter for prose mechanics.
#[derive(Debug, Default)]
pub struct SentenceGrammarAdapter;

impl SentenceGrammarAdapter {
    /// Prose-shaped: a labeled sentence, or a text block of several words.
    fn is_prose(observable: &Observable) -> bool {
        match observable.kind {
            ObservableKind::Sentence => true,
            ObservableKind::TextBlock => observable.content.split_whitespace().count() >= 3,
            ObservableKind::SymbolicExpression => false,
        }
    }
}

impl DomainAdapter for SentenceGrammarAdapter {
    fn domain(&self) -> &'static str {
        "sentence-grammar"
    }

    fn can_handle(&self, observable: &Observable) -> bool {
        Self::is_prose(observable)
    }

    fn analyze(
        &self,
        observable: &Observable,
        _state: &ObservationState,
        recent_event: Option<&TransformationEvent>,
    ) -> AdapterAnalysis {
        let issues = scan_issues(&observable.content);
        match issues.first() {
            Some(issue) => AdapterAnalysis::hint(issue.question()),
            None => {
                if recent_event.is_some_and(|e| e.kind == TransformationKind::Replace) {
                    AdapterAnalysis::encouragement("That revision reads well — keep going.")
                } else {
                    AdapterAnalysis::silent()
                }
            }
        }
    }

    fn validate_transition(
        &self,
        prev: &Observable,
        curr: &Observable,
        _event: &TransformationEvent,
    ) -> StepValidation {
        let before = scan_issues(&prev.content);
        let after = scan_issues(&curr.content);

        let introduced: Vec<GrammarIssue> =
            after.iter().copied().filter(|i| !before.contains(i)).collect();
        if let Some(issue) = introduced.first() {
            return StepValidation::invalid("The edit changed something worth a second look.")
                .with_correction_pointer(issue.question());
        }
        if !before.is_empty() && after.is_empty() {
            let mut validation = StepValidation::valid();
            validation.message = Some("That cleaned the sentence up nicely.".to_string());
            return validation;
        }
        StepValidation::valid()
    }

    fn generate_guided_question(&self, _observable: &Observable) -> String {
        "Read your sentence aloud — does it sound complete?".to_string()
    }
}
