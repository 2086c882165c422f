//! Observable classification — deterministic, history-free content → kind.

use sage_core::types::ObservableKind;

const MATH_OPERATORS: &[char] = &['=', '+', '×', '÷', '*', '/', '−', '·'];

const VERB_SUFFIXES: &[&str] = &["ing", "ed", "es", "s"];

const COMMON_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "am", "has", "have", "had", "do", "does", "did",
    "can", "will", "would", "should", "went", "go", "goes", "ran", "run", "see", "saw", "said",
    "say", "made", "make",
];

/// Classify recognized text into a semantic kind.
///
/// Idempotent: identical input always yields the identical kind.
pub fn classify(content: &str) -> ObservableKind {
    let trimmed = content.trim();
    if looks_symbolic(trimmed) {
        ObservableKind::SymbolicExpression
    } else if looks_like_sentence(trimmed) {
        ObservableKind::Sentence
    } else {
        ObservableKind::TextBlock
    }
}

/// Math content: an operator or `=` alongside at least one digit. A lone
/// hyphen between words is not treated as subtraction.
fn looks_symbolic(content: &str) -> bool {
    let has_digit = content.chars().any(|c| c.is_ascii_digit());
    if !has_digit {
        return false;
    }
    if content.chars().any(|c| MATH_OPERATORS.contains(&c)) {
        return true;
    }
    // ASCII x between digits reads as multiplication: "5x11"
    let bytes: Vec<char> = content.chars().collect();
    bytes.windows(3).any(|w| {
        w[0].is_ascii_digit() && (w[1] == 'x' || w[1] == 'X' || w[1] == '-') && w[2].is_ascii_digit()
    })
}

/// Sentence shape: leading capital, terminal punctuation, and a verb-like
/// token somewhere in between.
fn looks_like_sentence(content: &str) -> bool {
    let starts_capitalized = content.chars().next().is_some_and(|c| c.is_uppercase());
    let ends_terminated = content.ends_with(['.', '!', '?']);
    starts_capitalized && ends_terminated && has_verb_like_token(content)
}

/// A token counts as verb-like when it is a common auxiliary/irregular verb
/// or carries a conjugation suffix on a stem of at least two characters.
pub(crate) fn has_verb_like_token(content: &str) -> bool {
    content
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .any(|t| {
            COMMON_VERBS.contains(&t.as_str())
                || VERB_SUFFIXES
                    .iter()
                    .any(|suffix| t.len() > suffix.len() + 1 && t.ends_with(suffix))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equation_is_symbolic() {
        assert_eq!(classify("5×11=55"), ObservableKind::SymbolicExpression);
        assert_eq!(classify("3 + 4"), ObservableKind::SymbolicExpression);
        assert_eq!(classify("12x3"), ObservableKind::SymbolicExpression);
    }

    #[test]
    fn prose_with_shape_is_sentence() {
        assert_eq!(classify("The dog runs fast."), ObservableKind::Sentence);
        assert_eq!(classify("She was late!"), ObservableKind::Sentence);
    }

    #[test]
    fn fragments_are_text_blocks() {
        assert_eq!(classify("shopping list"), ObservableKind::TextBlock);
        assert_eq!(classify("Chapter 3"), ObservableKind::TextBlock);
    }

    #[test]
    fn hyphenated_words_are_not_symbolic() {
        assert_eq!(classify("well-known fact"), ObservableKind::TextBlock);
    }

    #[test]
    fn classification_is_idempotent() {
        let input = "The cat sat on the mat.";
        assert_eq!(classify(input), classify(input));
    }

    #[test]
    fn missing_terminal_punctuation_is_not_a_sentence() {
        assert_eq!(classify("The dog runs fast"), ObservableKind::TextBlock);
    }
}
