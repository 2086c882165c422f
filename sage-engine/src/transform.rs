//! Transformation detection — diffing two versions of content at one slot.

use sage_core::types::collections::FxHashSet;
use sage_core::types::TransformationKind;

/// Length delta below which same-token content counts as a reorder.
const REORDER_MAX_LEN_DELTA: usize = 10;

/// Sorted-token similarity above which content counts as a reorder.
const REORDER_SIMILARITY: f64 = 0.7;

/// Detect how content changed between two samples of the same slot.
///
/// Returns `None` when nothing changed. Adapters may override this with
/// domain nuance but must return the same enum.
pub fn detect_transformation(before: &str, after: &str) -> Option<TransformationKind> {
    let before = before.trim();
    let after = after.trim();

    if before == after {
        return None;
    }
    if after.len() > before.len() && after.contains(before) {
        return Some(TransformationKind::Add);
    }
    if before.len() > after.len() && before.contains(after) {
        return Some(TransformationKind::Remove);
    }
    let len_delta = before.len().abs_diff(after.len());
    if sorted_token_similarity(before, after) > REORDER_SIMILARITY && len_delta < REORDER_MAX_LEN_DELTA
    {
        return Some(TransformationKind::Reorder);
    }
    Some(TransformationKind::Replace)
}

/// Dice similarity over sorted token multisets.
///
/// 1.0 when both sides carry the same tokens regardless of order; falls
/// toward 0.0 as the token populations diverge.
pub fn sorted_token_similarity(a: &str, b: &str) -> f64 {
    let mut tokens_a: Vec<&str> = a.split_whitespace().collect();
    let mut tokens_b: Vec<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 0.0;
    }
    tokens_a.sort_unstable();
    tokens_b.sort_unstable();

    // Two-pointer walk over the sorted multisets
    let mut shared = 0usize;
    let (mut i, mut j) = (0usize, 0usize);
    while i < tokens_a.len() && j < tokens_b.len() {
        match tokens_a[i].cmp(tokens_b[j]) {
            std::cmp::Ordering::Equal => {
                shared += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    (2 * shared) as f64 / (tokens_a.len() + tokens_b.len()) as f64
}

/// Jaccard similarity over word sets — used for content and phrase dedup.
pub fn word_overlap_similarity(a: &str, b: &str) -> f64 {
    let set_a: FxHashSet<String> = a.split_whitespace().map(|t| t.to_lowercase()).collect();
    let set_b: FxHashSet<String> = b.split_whitespace().map(|t| t.to_lowercase()).collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
