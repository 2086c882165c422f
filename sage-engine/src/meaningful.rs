//! Meaningful event projection — compresses the raw change log into
//! human-relevant categories. Read-only; never feeds back into state.

use sage_core::types::collections::FxHashSet;
use sage_core::types::{
    MeaningfulEvent, MeaningfulEventKind, TransformationEvent, TransformationKind,
};

use crate::fingerprint::normalize_content;

/// Result of projecting a window of raw transformations.
#[derive(Debug, Clone, Default)]
pub struct MeaningfulProjection {
    /// Emitted, de-noised events in log order.
    pub events: Vec<MeaningfulEvent>,
    /// Later `add`s for an already-seen id, dropped from the emitted list.
    pub duplicates_ignored: usize,
}

impl MeaningfulProjection {
    pub fn correction_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == MeaningfulEventKind::CorrectionDetected)
            .count()
    }

    pub fn churn_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    MeaningfulEventKind::CorrectionDetected | MeaningfulEventKind::AnnotationDetected
                )
            })
            .count()
    }
}

/// Project raw transformations into meaningful events.
///
/// Rules: first `add` per id → new_observation; later `add`s for the same id
/// are dropped as duplicates; non-trivial `replace` → correction_detected;
/// `annotate` → annotation_detected; `classify` → classification_detected;
/// `remove` preceded by an `add` → step_completed.
pub fn project(transformations: &[TransformationEvent]) -> MeaningfulProjection {
    let mut projection = MeaningfulProjection::default();
    let mut added_ids: FxHashSet<&str> = FxHashSet::default();

    for event in transformations {
        match event.kind {
            TransformationKind::Add => {
                if added_ids.insert(&event.observable_id) {
                    projection.events.push(meaningful(
                        MeaningfulEventKind::NewObservation,
                        event,
                        "new work detected",
                    ));
                } else {
                    projection.duplicates_ignored += 1;
                }
            }
            TransformationKind::Replace => {
                // Trivial rewrites (same content after normalization) are noise
                if normalize_content(&event.before) != normalize_content(&event.after) {
                    projection.events.push(meaningful(
                        MeaningfulEventKind::CorrectionDetected,
                        event,
                        "content was corrected",
                    ));
                }
            }
            TransformationKind::Annotate => {
                projection.events.push(meaningful(
                    MeaningfulEventKind::AnnotationDetected,
                    event,
                    "annotation added",
                ));
            }
            TransformationKind::Classify => {
                projection.events.push(meaningful(
                    MeaningfulEventKind::ClassificationDetected,
                    event,
                    "content was reclassified",
                ));
            }
            TransformationKind::Remove => {
                if added_ids.contains(event.observable_id.as_str()) {
                    projection.events.push(meaningful(
                        MeaningfulEventKind::StepCompleted,
                        event,
                        "a step was wrapped up",
                    ));
                }
            }
            TransformationKind::Reorder => {
                // Reorders are not meaningful on their own
            }
        }
    }

    projection
}

fn meaningful(
    kind: MeaningfulEventKind,
    event: &TransformationEvent,
    summary: &str,
) -> MeaningfulEvent {
    MeaningfulEvent {
        kind,
        observable_id: event.observable_id.clone(),
        summary: summary.to_string(),
        timestamp_ms: event.timestamp_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::types::{Bounds, ObservableKind};

    fn event(id: &str, kind: TransformationKind, before: &str, after: &str) -> TransformationEvent {
        TransformationEvent::new(
            format!("t-{id}-{kind}"),
            kind,
            id,
            ObservableKind::TextBlock,
            0,
            before,
            after,
            Bounds::full(),
        )
    }

    #[test]
    fn repeated_adds_collapse_to_one_new_observation() {
        let log = vec![
            event("o1", TransformationKind::Add, "", "x"),
            event("o1", TransformationKind::Add, "", "x"),
            event("o1", TransformationKind::Add, "", "x"),
        ];
        let projection = project(&log);
        assert_eq!(projection.events.len(), 1);
        assert_eq!(projection.events[0].kind, MeaningfulEventKind::NewObservation);
        assert_eq!(projection.duplicates_ignored, 2);
    }

    #[test]
    fn trivial_replace_is_dropped() {
        let log = vec![event("o1", TransformationKind::Replace, "a  b", "a b")];
        assert!(project(&log).events.is_empty());
    }

    #[test]
    fn real_replace_is_a_correction() {
        let log = vec![event("o1", TransformationKind::Replace, "5×11=56", "5×11=55")];
        let projection = project(&log);
        assert_eq!(projection.events.len(), 1);
        assert_eq!(projection.events[0].kind, MeaningfulEventKind::CorrectionDetected);
    }

    #[test]
    fn remove_after_add_completes_a_step() {
        let log = vec![
            event("o1", TransformationKind::Add, "", "draft"),
            event("o1", TransformationKind::Remove, "draft", ""),
        ];
        let projection = project(&log);
        assert_eq!(projection.events.len(), 2);
        assert_eq!(projection.events[1].kind, MeaningfulEventKind::StepCompleted);
    }

    #[test]
    fn remove_without_prior_add_is_dropped() {
        let log = vec![event("o1", TransformationKind::Remove, "draft", "")];
        assert!(project(&log).events.is_empty());
    }

    #[test]
    fn annotate_and_classify_pass_through() {
        let log = vec![
            event("o1", TransformationKind::Annotate, "x", "x*"),
            event("o1", TransformationKind::Classify, "x", "x"),
        ];
        let kinds: Vec<_> = project(&log).events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MeaningfulEventKind::AnnotationDetected,
                MeaningfulEventKind::ClassificationDetected,
            ]
        );
    }
}
