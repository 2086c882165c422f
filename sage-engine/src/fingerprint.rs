//! Snapshot fingerprints via xxh3 — "did anything new happen?"

use sage_core::types::ObservableKind;
use xxhash_rust::xxh3::xxh3_64;

/// Collapse whitespace runs, trim, and lowercase for semantic comparison.
pub fn normalize_content(content: &str) -> String {
    content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Stable fingerprint over (kind, normalized content, confidence@2dp).
pub fn fingerprint(kind: ObservableKind, content: &str, confidence: f64) -> u64 {
    let key = format!(
        "{}|{}|{:.2}",
        kind.name(),
        normalize_content(content),
        confidence
    );
    xxh3_64(key.as_bytes())
}

/// Hash of a dispatched text message, for dedup bookkeeping.
#[inline]
pub fn hash_text(text: &str) -> u64 {
    xxh3_64(normalize_content(text).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint(ObservableKind::SymbolicExpression, "5×11=55", 0.9);
        let b = fingerprint(ObservableKind::SymbolicExpression, "5×11=55", 0.9);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_ignores_whitespace_and_case() {
        let a = fingerprint(ObservableKind::Sentence, "The  Dog   runs.", 0.8);
        let b = fingerprint(ObservableKind::Sentence, "the dog runs.", 0.8);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_rounds_confidence_to_two_decimals() {
        let a = fingerprint(ObservableKind::TextBlock, "note", 0.851);
        let b = fingerprint(ObservableKind::TextBlock, "note", 0.853);
        let c = fingerprint(ObservableKind::TextBlock, "note", 0.86);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fingerprint_differs_by_kind() {
        let a = fingerprint(ObservableKind::TextBlock, "5", 0.9);
        let b = fingerprint(ObservableKind::SymbolicExpression, "5", 0.9);
        assert_ne!(a, b);
    }
}
