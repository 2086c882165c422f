//! The host-facing event handler trait. Every method has a no-op default so
//! sinks implement only what they care about.

use super::types::*;

pub trait SessionEventHandler: Send + Sync {
    fn on_session_started(&self, _event: &SessionStartedEvent) {}
    fn on_session_stopped(&self, _event: &SessionStoppedEvent) {}
    fn on_observable_detected(&self, _event: &ObservableDetectedEvent) {}
    fn on_transformation_recorded(&self, _event: &TransformationRecordedEvent) {}
    fn on_feedback(&self, _event: &FeedbackEvent) {}
    fn on_intervention(&self, _event: &InterventionDispatchedEvent) {}
    fn on_roi_suggested(&self, _event: &RoiSuggestedEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
