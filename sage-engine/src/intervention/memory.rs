//! Intervention memory — the cooldown/hysteresis bookkeeping threaded by
//! the caller between decision cycles. Immutable: updates return a
//! successor value.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use sage_core::types::collections::FxHashMap;

use super::types::DoubtReason;

/// Doubt reasons observed for one snapshot, with their severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoubtSample {
    pub reasons: SmallVec<[DoubtReason; 4]>,
    /// 1 − confidence when reasons exist, else 0.
    pub severity: f64,
}

/// Rolling bookkeeping owned by the caller/session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterventionMemory {
    /// Last text intervention: time and normalized-message hash.
    pub last_text_ms: Option<u64>,
    pub last_text_hash: Option<u64>,
    /// Last spoken intervention.
    pub last_audio_ms: Option<u64>,
    pub last_audio_phrase: Option<String>,
    pub last_audio_reason: Option<DoubtReason>,
    pub last_audio_was_wait_opener: bool,
    /// Per-reason audio timestamps.
    pub audio_ms_by_reason: FxHashMap<DoubtReason, u64>,
    /// Rolling window of the most recent snapshot analyses (current + 2 prior).
    pub doubt_window: SmallVec<[DoubtSample; 3]>,
    /// Fingerprint and severity of the last processed snapshot.
    pub last_fingerprint: Option<u64>,
    pub last_severity: f64,
    /// Content of the last processed snapshot, for word-overlap dedup.
    pub last_content: Option<String>,
}

impl InterventionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successor with this cycle's snapshot recorded: doubt sample pushed
    /// into the 3-entry window, fingerprint/severity/content replaced.
    pub fn with_snapshot(
        &self,
        sample: DoubtSample,
        fingerprint: u64,
        content: &str,
        window: usize,
    ) -> Self {
        let mut next = self.clone();
        next.doubt_window.push(sample);
        while next.doubt_window.len() > window {
            next.doubt_window.remove(0);
        }
        next.last_severity = next.doubt_window.last().map(|s| s.severity).unwrap_or(0.0);
        next.last_fingerprint = Some(fingerprint);
        next.last_content = Some(content.to_string());
        next
    }

    /// Successor with a dispatched text intervention recorded.
    pub fn with_text(&self, now_ms: u64, message_hash: u64) -> Self {
        let mut next = self.clone();
        next.last_text_ms = Some(now_ms);
        next.last_text_hash = Some(message_hash);
        next
    }

    /// Successor with a spoken intervention recorded.
    pub fn with_audio(
        &self,
        now_ms: u64,
        phrase: &str,
        reason: DoubtReason,
        wait_opener: bool,
    ) -> Self {
        let mut next = self.clone();
        next.last_audio_ms = Some(now_ms);
        next.last_audio_phrase = Some(phrase.to_string());
        next.last_audio_reason = Some(reason);
        next.last_audio_was_wait_opener = wait_opener;
        next.audio_ms_by_reason.insert(reason, now_ms);
        next
    }

    /// How many samples in the window carry the reason.
    pub fn reason_hits(&self, reason: DoubtReason) -> usize {
        self.doubt_window
            .iter()
            .filter(|s| s.reasons.contains(&reason))
            .count()
    }

    /// The most frequent reason appearing in at least `min_hits` samples.
    /// Ties break by severity order: arithmetic first, readability last.
    pub fn persistent_reason(&self, min_hits: usize) -> Option<DoubtReason> {
        const PRIORITY: [DoubtReason; 6] = [
            DoubtReason::ResultSuspicious,
            DoubtReason::SignUncertain,
            DoubtReason::MultipleItems,
            DoubtReason::RepeatedChange,
            DoubtReason::LowConfidence,
            DoubtReason::StepIncomplete,
        ];
        let mut best: Option<(DoubtReason, usize)> = None;
        for reason in PRIORITY {
            let hits = self.reason_hits(reason);
            if hits >= min_hits && best.map_or(true, |(_, b)| hits > b) {
                best = Some((reason, hits));
            }
        }
        best.map(|(reason, _)| reason)
    }

    /// Whether the per-reason audio cooldown has elapsed.
    pub fn reason_audio_ready(&self, reason: DoubtReason, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.audio_ms_by_reason.get(&reason) {
            Some(&last) => now_ms.saturating_sub(last) >= cooldown_ms,
            None => true,
        }
    }

    /// Whether the global audio cooldown has elapsed.
    pub fn global_audio_ready(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_audio_ms {
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
            None => true,
        }
    }

    /// Whether the text cooldown has elapsed and the message is not a repeat.
    pub fn text_ready(&self, now_ms: u64, cooldown_ms: u64, message_hash: u64) -> bool {
        let cooled = match self.last_text_ms {
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
            None => true,
        };
        cooled && self.last_text_hash != Some(message_hash)
    }

    /// Discard transient caches on session stop/reset.
    pub fn cleared(&self) -> Self {
        Self::new()
    }
}
