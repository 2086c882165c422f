//! Session observation state — exclusively owned by one orchestrator.

use serde::{Deserialize, Serialize};

use super::collections::FxHashMap;
use super::observable::{Bounds, Observable};
use super::transformation::TransformationEvent;

/// Everything the orchestrator tracks for one session.
///
/// Created on `initialize`, frozen on `stop`. The transformation log is
/// monotonically append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationState {
    pub session_id: String,
    pub start_time_ms: u64,
    pub observables: FxHashMap<String, Observable>,
    /// Observable ids in insertion order. Spatial matching scans this, not
    /// the map, so "first match wins" means first inserted.
    #[serde(default)]
    pub observable_order: Vec<String>,
    pub transformations: Vec<TransformationEvent>,
    pub current_step: u32,
    pub is_active: bool,
    pub roi_bounds: Bounds,
    pub last_snapshot_ms: u64,
    pub motion_detected: bool,
}

impl ObservationState {
    pub fn new(session_id: impl Into<String>, roi_bounds: Bounds, start_time_ms: u64) -> Self {
        Self {
            session_id: session_id.into(),
            start_time_ms,
            observables: FxHashMap::default(),
            observable_order: Vec::new(),
            transformations: Vec::new(),
            current_step: 0,
            is_active: true,
            roi_bounds,
            last_snapshot_ms: start_time_ms,
            motion_detected: false,
        }
    }

    /// Track a new observable, recording its insertion position.
    pub fn insert_observable(&mut self, observable: Observable) {
        self.observable_order.push(observable.id.clone());
        self.observables.insert(observable.id.clone(), observable);
    }

    /// Observables in insertion order.
    pub fn observables_in_order(&self) -> impl Iterator<Item = &Observable> {
        self.observable_order
            .iter()
            .filter_map(|id| self.observables.get(id))
    }

    /// The trailing `n` raw transformation events, oldest first.
    pub fn recent_transformations(&self, n: usize) -> &[TransformationEvent] {
        let len = self.transformations.len();
        &self.transformations[len.saturating_sub(n)..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observable::ObservableKind;
    use crate::types::transformation::TransformationKind;

    fn event(n: u64) -> TransformationEvent {
        TransformationEvent::new(
            format!("t{n}"),
            TransformationKind::Add,
            "o1",
            ObservableKind::TextBlock,
            n,
            "",
            "x",
            Bounds::full(),
        )
    }

    #[test]
    fn observables_iterate_in_insertion_order() {
        let mut state = ObservationState::new("s1", Bounds::full(), 0);
        for id in ["b", "a", "c"] {
            state.insert_observable(Observable::new(
                id,
                ObservableKind::TextBlock,
                "x",
                Bounds::full(),
                0.9,
                0,
            ));
        }
        let ids: Vec<&str> = state.observables_in_order().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn recent_transformations_clamps_to_log_length() {
        let mut state = ObservationState::new("s1", Bounds::full(), 0);
        state.transformations.push(event(1));
        state.transformations.push(event(2));
        assert_eq!(state.recent_transformations(10).len(), 2);
        assert_eq!(state.recent_transformations(1)[0].id, "t2");
    }
}
