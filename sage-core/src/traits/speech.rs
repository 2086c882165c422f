//! Speech output capability.

/// A host-provided speech channel. Phrases are short (the engine caps them
/// at 60 characters) and must be cancellable immediately.
pub trait SpeechSink: Send + Sync {
    /// Speak a short phrase. Implementations should begin playback promptly
    /// and must not block the caller.
    fn speak(&self, phrase: &str);

    /// Cancel any in-flight playback immediately.
    fn cancel(&self);
}

/// A sink that swallows all speech. Useful for tests and text-only hosts.
#[derive(Debug, Default)]
pub struct NullSpeechSink;

impl SpeechSink for NullSpeechSink {
    fn speak(&self, _phrase: &str) {}
    fn cancel(&self) {}
}
