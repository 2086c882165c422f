//! Engine configuration. Every tunable is optional in the file; the
//! `effective_*` accessors supply the shipped defaults.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Configuration for the observation/intervention engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Spatial match epsilon on normalized bounds. Default: 0.1.
    pub spatial_epsilon: Option<f64>,
    /// Below this confidence the gate asks for confirmation. Default: 0.60.
    pub confirm_threshold: Option<f64>,
    /// Upper edge of the `low_confidence` doubt band. Default: 0.70.
    pub doubt_band_max: Option<f64>,
    /// Sign-confidence band in which an ambiguous operator counts as doubt.
    /// Defaults: [0.45, 0.65].
    pub sign_band_low: Option<f64>,
    pub sign_band_high: Option<f64>,
    /// Operands at or above this are not arithmetic-checked. Default: 100.
    pub operand_limit: Option<i64>,
    /// Cooldown between text interventions. Default: 10_000 ms.
    pub text_cooldown_ms: Option<u64>,
    /// Global cooldown since any spoken intervention. Default: 12_000 ms.
    pub audio_global_cooldown_ms: Option<u64>,
    /// Per-reason cooldown for spoken interventions. Default: 45_000 ms.
    pub audio_reason_cooldown_ms: Option<u64>,
    /// Hard cap on audio phrase length. Default: 60 chars.
    pub audio_max_chars: Option<usize>,
    /// Similarity above which a candidate phrase/content is a duplicate.
    /// Default: 0.9.
    pub dedup_similarity: Option<f64>,
    /// Doubt severity must rise by at least this to beat the novelty gate.
    /// Default: 0.3.
    pub severity_rise_threshold: Option<f64>,
    /// Raw transformations projected for the UI each cycle. Default: 10.
    pub meaningful_window: Option<usize>,
    /// Snapshot window for doubt hysteresis. Default: 3.
    pub doubt_window: Option<usize>,
    /// Occurrences within the window before a doubt reason is actionable.
    /// Default: 2.
    pub doubt_min_hits: Option<usize>,
    /// Correction/annotation events that count as `repeated_change`.
    /// Default: 3.
    pub repeated_change_threshold: Option<usize>,
    /// Correction events that count as `multiple_items`. Default: 2.
    pub multiple_items_threshold: Option<usize>,
    /// Minimum confidence before ROI tightening is proposed. Default: 0.70.
    pub roi_min_confidence: Option<f64>,
    /// Dark-bbox fill band in which tightening applies. Defaults: [0.10, 0.55].
    pub roi_min_fill: Option<f64>,
    pub roi_max_fill: Option<f64>,
    /// Padding added around the dark bbox. Default: 0.10.
    pub roi_padding: Option<f64>,
    /// Content preview cap in confirmation questions. Default: 50 chars.
    pub preview_max_chars: Option<usize>,
}

impl EngineConfig {
    /// Parse a TOML document into a config.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn effective_spatial_epsilon(&self) -> f64 {
        self.spatial_epsilon.unwrap_or(0.1)
    }

    pub fn effective_confirm_threshold(&self) -> f64 {
        self.confirm_threshold.unwrap_or(0.60)
    }

    pub fn effective_doubt_band_max(&self) -> f64 {
        self.doubt_band_max.unwrap_or(0.70)
    }

    pub fn effective_sign_band(&self) -> (f64, f64) {
        (
            self.sign_band_low.unwrap_or(0.45),
            self.sign_band_high.unwrap_or(0.65),
        )
    }

    pub fn effective_operand_limit(&self) -> i64 {
        self.operand_limit.unwrap_or(100)
    }

    pub fn effective_text_cooldown_ms(&self) -> u64 {
        self.text_cooldown_ms.unwrap_or(10_000)
    }

    pub fn effective_audio_global_cooldown_ms(&self) -> u64 {
        self.audio_global_cooldown_ms.unwrap_or(12_000)
    }

    pub fn effective_audio_reason_cooldown_ms(&self) -> u64 {
        self.audio_reason_cooldown_ms.unwrap_or(45_000)
    }

    pub fn effective_audio_max_chars(&self) -> usize {
        self.audio_max_chars.unwrap_or(60)
    }

    pub fn effective_dedup_similarity(&self) -> f64 {
        self.dedup_similarity.unwrap_or(0.9)
    }

    pub fn effective_severity_rise_threshold(&self) -> f64 {
        self.severity_rise_threshold.unwrap_or(0.3)
    }

    pub fn effective_meaningful_window(&self) -> usize {
        self.meaningful_window.unwrap_or(10)
    }

    pub fn effective_doubt_window(&self) -> usize {
        self.doubt_window.unwrap_or(3)
    }

    pub fn effective_doubt_min_hits(&self) -> usize {
        self.doubt_min_hits.unwrap_or(2)
    }

    pub fn effective_repeated_change_threshold(&self) -> usize {
        self.repeated_change_threshold.unwrap_or(3)
    }

    pub fn effective_multiple_items_threshold(&self) -> usize {
        self.multiple_items_threshold.unwrap_or(2)
    }

    pub fn effective_roi_min_confidence(&self) -> f64 {
        self.roi_min_confidence.unwrap_or(0.70)
    }

    pub fn effective_roi_fill_band(&self) -> (f64, f64) {
        (
            self.roi_min_fill.unwrap_or(0.10),
            self.roi_max_fill.unwrap_or(0.55),
        )
    }

    pub fn effective_roi_padding(&self) -> f64 {
        self.roi_padding.unwrap_or(0.10)
    }

    pub fn effective_preview_max_chars(&self) -> usize {
        self.preview_max_chars.unwrap_or(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_thresholds() {
        let config = EngineConfig::default();
        assert_eq!(config.effective_spatial_epsilon(), 0.1);
        assert_eq!(config.effective_confirm_threshold(), 0.60);
        assert_eq!(config.effective_text_cooldown_ms(), 10_000);
        assert_eq!(config.effective_audio_global_cooldown_ms(), 12_000);
        assert_eq!(config.effective_audio_reason_cooldown_ms(), 45_000);
        assert_eq!(config.effective_audio_max_chars(), 60);
        assert_eq!(config.effective_doubt_window(), 3);
        assert_eq!(config.effective_doubt_min_hits(), 2);
        assert_eq!(config.effective_roi_fill_band(), (0.10, 0.55));
    }

    #[test]
    fn toml_overrides_take_effect() {
        let config = EngineConfig::from_toml_str(
            "confirm_threshold = 0.5\naudio_max_chars = 80\n",
        )
        .unwrap();
        assert_eq!(config.effective_confirm_threshold(), 0.5);
        assert_eq!(config.effective_audio_max_chars(), 80);
        // Untouched fields keep defaults
        assert_eq!(config.effective_spatial_epsilon(), 0.1);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(EngineConfig::from_toml_str("confirm_threshold = [").is_err());
    }
}
