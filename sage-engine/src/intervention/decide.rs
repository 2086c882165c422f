//! The intervention decision function. Pure: all bookkeeping comes in via
//! [`InterventionMemory`] and goes out as its successor.

use sage_core::config::EngineConfig;
use sage_core::types::{InterventionKind, MeaningfulEventKind, ObservableKind};

use crate::adapters::symbolic::{has_ambiguous_operator, result_suspicious};
use crate::fingerprint::{fingerprint, hash_text};
use crate::transform::word_overlap_similarity;

use super::memory::{DoubtSample, InterventionMemory};
use super::types::{DecisionContext, DoubtReason, Intervention, LearnerIntent};

const CAPTURE_QUALITY_MESSAGE: &str =
    "I can't quite read this. Could you move closer or write a bit bigger?";

const STEP_COMPLETE_MESSAGE: &str = "That line looks complete. What comes next?";

/// One decision cycle's output: the intervention (if any) and the successor
/// memory the caller must thread into the next cycle.
#[derive(Debug, Clone)]
pub struct Decision {
    pub intervention: Option<Intervention>,
    pub memory: InterventionMemory,
}

impl Decision {
    fn silent(memory: InterventionMemory) -> Self {
        Self { intervention: None, memory }
    }
}

/// Decide silence vs. text vs. text+speech for one cycle.
pub fn decide(
    ctx: &DecisionContext<'_>,
    memory: &InterventionMemory,
    config: &EngineConfig,
) -> Decision {
    // Rule 1: never interrupt a moving pen.
    if ctx.intent == LearnerIntent::WritingInProgress {
        return Decision::silent(memory.clone());
    }

    let reasons = compute_doubt_reasons(ctx, config);
    let severity = if reasons.is_empty() { 0.0 } else { 1.0 - ctx.confidence };
    let fp = fingerprint(ctx.kind, ctx.content, ctx.confidence);

    let prev_fingerprint = memory.last_fingerprint;
    let prev_severity = memory.last_severity;
    let prev_content = memory.last_content.clone();

    let sample = DoubtSample { reasons: reasons.iter().copied().collect(), severity };
    let next = memory.with_snapshot(sample, fp, ctx.content, config.effective_doubt_window());

    // Rule 2: novelty gate — nothing new happened and doubt did not worsen.
    if prev_fingerprint == Some(fp)
        && severity - prev_severity < config.effective_severity_rise_threshold()
    {
        return Decision::silent(next);
    }

    // Rule 3: near-identical content is a duplicate.
    if let Some(prev) = &prev_content {
        if word_overlap_similarity(ctx.content, prev) > config.effective_dedup_similarity() {
            return Decision::silent(next);
        }
    }

    // Rule 4: unreadable capture. Text-only, cooled down, never spoken.
    if ctx.confidence < config.effective_confirm_threshold() {
        let hash = hash_text(CAPTURE_QUALITY_MESSAGE);
        if next.text_ready(ctx.now_ms, config.effective_text_cooldown_ms(), hash) {
            return Decision {
                intervention: Some(Intervention::text_only(
                    CAPTURE_QUALITY_MESSAGE,
                    InterventionKind::Hint,
                )),
                memory: next.with_text(ctx.now_ms, hash),
            };
        }
        return Decision::silent(next);
    }

    // Hysteresis: a reason acts only once persistent across the window,
    // and only while the capture rectangle is holding still.
    let persistent = if ctx.roi_stable {
        next.persistent_reason(config.effective_doubt_min_hits())
    } else {
        None
    };

    match persistent {
        Some(reason) => doubt_intervention(reason, ctx, next, config),
        None => {
            // Rules 5 and 6: nothing persistent — and an open tool panel
            // suppresses even the follow-up path.
            if ctx.tool_panel_open {
                return Decision::silent(next);
            }
            step_completion(ctx, next, config)
        }
    }
}

/// Evaluate the per-cycle doubt table. Reasons are independent of each other.
pub fn compute_doubt_reasons(ctx: &DecisionContext<'_>, config: &EngineConfig) -> Vec<DoubtReason> {
    let mut reasons = Vec::new();
    let confirm = config.effective_confirm_threshold();

    if ctx.confidence >= confirm && ctx.confidence < config.effective_doubt_band_max() {
        reasons.push(DoubtReason::LowConfidence);
    }

    if has_ambiguous_operator(ctx.content) {
        if let Some(sign_confidence) = ctx.sign_confidence {
            let (low, high) = config.effective_sign_band();
            if (low..=high).contains(&sign_confidence) {
                reasons.push(DoubtReason::SignUncertain);
            }
        }
    }

    if ctx.confidence >= confirm
        && result_suspicious(ctx.content, config.effective_operand_limit())
    {
        reasons.push(DoubtReason::ResultSuspicious);
    }

    let corrections = ctx
        .recent_events
        .iter()
        .filter(|e| e.kind == MeaningfulEventKind::CorrectionDetected)
        .count();
    if corrections >= config.effective_multiple_items_threshold() {
        reasons.push(DoubtReason::MultipleItems);
    }

    if ctx.kind == ObservableKind::SymbolicExpression && !ctx.content.contains('=') {
        reasons.push(DoubtReason::StepIncomplete);
    }

    let churn = ctx
        .recent_events
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                MeaningfulEventKind::CorrectionDetected | MeaningfulEventKind::AnnotationDetected
            )
        })
        .count();
    if churn >= config.effective_repeated_change_threshold() {
        reasons.push(DoubtReason::RepeatedChange);
    }

    reasons
}

/// Build the doubt-driven intervention, including the audio policy.
fn doubt_intervention(
    reason: DoubtReason,
    ctx: &DecisionContext<'_>,
    next: InterventionMemory,
    config: &EngineConfig,
) -> Decision {
    let message = text_message(reason);
    let kind = match reason {
        DoubtReason::ResultSuspicious => InterventionKind::Correction,
        _ => InterventionKind::Hint,
    };

    let mut speak = false;
    let mut audio_phrase = None;
    let mut wait_opener = false;

    if reason.audio_allowed() {
        let phrase = truncate_chars(audio_message(reason), config.effective_audio_max_chars());
        wait_opener = is_wait_opener(&phrase);
        let repeat_of_last = next.last_audio_reason == Some(reason)
            && next
                .last_audio_phrase
                .as_deref()
                .is_some_and(|p| {
                    word_overlap_similarity(p, &phrase) > config.effective_dedup_similarity()
                });
        if next.reason_audio_ready(reason, ctx.now_ms, config.effective_audio_reason_cooldown_ms())
            && next.global_audio_ready(ctx.now_ms, config.effective_audio_global_cooldown_ms())
            && !(wait_opener && next.last_audio_was_wait_opener)
            && !repeat_of_last
        {
            speak = true;
            audio_phrase = Some(phrase);
        }
    }

    let intervention = Intervention {
        message: message.to_string(),
        kind,
        speak,
        audio_phrase: audio_phrase.clone(),
        reason: Some(reason),
    };

    let mut memory = next.with_text(ctx.now_ms, hash_text(message));
    if let Some(phrase) = &audio_phrase {
        memory = memory.with_audio(ctx.now_ms, phrase, reason, wait_opener);
    }
    Decision { intervention: Some(intervention), memory }
}

/// Text-only encouragement when a fresh observation looks finished.
fn step_completion(
    ctx: &DecisionContext<'_>,
    next: InterventionMemory,
    config: &EngineConfig,
) -> Decision {
    let completed = ctx.content.contains('=') || ctx.content.lines().count() >= 3;
    if !(ctx.new_observation && completed) {
        return Decision::silent(next);
    }
    let hash = hash_text(STEP_COMPLETE_MESSAGE);
    if !next.text_ready(ctx.now_ms, config.effective_text_cooldown_ms(), hash) {
        return Decision::silent(next);
    }
    Decision {
        intervention: Some(Intervention::text_only(
            STEP_COMPLETE_MESSAGE,
            InterventionKind::Encouragement,
        )),
        memory: next.with_text(ctx.now_ms, hash),
    }
}

fn text_message(reason: DoubtReason) -> &'static str {
    match reason {
        DoubtReason::LowConfidence => {
            "I might be misreading this line. Could you double-check what's written?"
        }
        DoubtReason::SignUncertain => "Is that symbol a times sign? Worth a second look.",
        DoubtReason::ResultSuspicious => {
            "Hmm, does your result really follow from that operation?"
        }
        DoubtReason::MultipleItems => {
            "You've made a few corrections here. Want to review them together?"
        }
        DoubtReason::StepIncomplete => "What will go on the other side of the = sign?",
        DoubtReason::RepeatedChange => {
            "This line keeps changing. Would it help to pause and talk it through?"
        }
    }
}

fn audio_message(reason: DoubtReason) -> &'static str {
    match reason {
        DoubtReason::ResultSuspicious => "Wait, double-check that result.",
        DoubtReason::MultipleItems => "Quite a few edits there. Shall we review?",
        DoubtReason::SignUncertain => "Is that a times sign?",
        // Text-only reasons never reach the audio channel
        _ => "",
    }
}

fn is_wait_opener(phrase: &str) -> bool {
    let lower = phrase.trim_start().to_lowercase();
    lower.starts_with("wait") || lower.starts_with("hold on") || lower.starts_with("hmm")
}

/// Truncate rather than wrap: audio must stay under ~2.5 seconds.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
