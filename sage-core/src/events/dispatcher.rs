//! EventDispatcher — synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use tracing::warn;

use super::handler::SessionEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec —
/// effectively zero cost.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn SessionEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn SessionEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// Handlers that panic are caught and do not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn SessionEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_session_started(&self, event: &SessionStartedEvent) {
        self.emit(|h| h.on_session_started(event));
    }

    pub fn emit_session_stopped(&self, event: &SessionStoppedEvent) {
        self.emit(|h| h.on_session_stopped(event));
    }

    pub fn emit_observable_detected(&self, event: &ObservableDetectedEvent) {
        self.emit(|h| h.on_observable_detected(event));
    }

    pub fn emit_transformation_recorded(&self, event: &TransformationRecordedEvent) {
        self.emit(|h| h.on_transformation_recorded(event));
    }

    pub fn emit_feedback(&self, event: &FeedbackEvent) {
        self.emit(|h| h.on_feedback(event));
    }

    pub fn emit_intervention(&self, event: &InterventionDispatchedEvent) {
        self.emit(|h| h.on_intervention(event));
    }

    pub fn emit_roi_suggested(&self, event: &RoiSuggestedEvent) {
        self.emit(|h| h.on_roi_suggested(event));
    }

    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
