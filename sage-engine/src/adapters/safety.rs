//! Solving-phrase safety filter.
//!
//! A coarse substring scan, not a semantic guarantee: any generated text
//! that reads like a disclosed solution is rewritten in place to a generic
//! Socratic prompt before dispatch. Mandatory for all adapter output.

use std::sync::OnceLock;

use aho_corasick::AhoCorasick;
use regex::Regex;

use sage_core::types::{AdapterAnalysis, StepValidation};

/// The replacement used whenever generated text trips the filter.
pub const SOCRATIC_FALLBACK: &str = "What do you think the next step should be?";

const SOLVING_PHRASES: &[&str] = &[
    "the answer is",
    "answer is",
    "the correct answer",
    "correct answer is",
    "the result is",
    "result is",
    "the solution is",
    "solution is",
    "it should be",
    "you should write",
    "the right answer",
    "equals",
];

fn phrase_scanner() -> &'static AhoCorasick {
    static SCANNER: OnceLock<AhoCorasick> = OnceLock::new();
    SCANNER.get_or_init(|| {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(SOLVING_PHRASES)
            .expect("static phrase list builds")
    })
}

fn stated_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // "= 55", "is 55", "be 55" — a value being handed over
    PATTERN.get_or_init(|| Regex::new(r"(?i)(=|\bis\b|\bbe\b)\s*-?\d").expect("static regex"))
}

/// True when the text contains a solving phrase or a stated numeric value.
pub fn discloses_solution(text: &str) -> bool {
    phrase_scanner().is_match(text) || stated_value_pattern().is_match(text)
}

/// Rewrite disclosing text to the generic Socratic prompt; pass clean text
/// through untouched.
pub fn sanitize_guidance(text: &str) -> String {
    if discloses_solution(text) {
        SOCRATIC_FALLBACK.to_string()
    } else {
        text.to_string()
    }
}

/// Sanitize every text field of an adapter analysis.
pub fn sanitize_analysis(mut analysis: AdapterAnalysis) -> AdapterAnalysis {
    analysis.suggestion = analysis.suggestion.map(|s| sanitize_guidance(&s));
    analysis.next_step = analysis.next_step.map(|s| sanitize_guidance(&s));
    analysis
}

/// Sanitize every text field of a step validation.
pub fn sanitize_validation(mut validation: StepValidation) -> StepValidation {
    validation.message = validation.message.map(|s| sanitize_guidance(&s));
    validation.suggested_correction = validation.suggested_correction.map(|s| sanitize_guidance(&s));
    validation
}
