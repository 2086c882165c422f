//! Observables — recognized units of learner work tracked at a spatial slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::collections::FxHashMap;

/// Semantic kind of a recognized observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservableKind {
    /// Math content: operators, `=`, digits.
    SymbolicExpression,
    /// Prose with sentence shape (capitalization, terminal punctuation).
    Sentence,
    /// Anything else — free-form notes, labels, fragments.
    TextBlock,
}

impl ObservableKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SymbolicExpression => "symbolic_expression",
            Self::Sentence => "sentence",
            Self::TextBlock => "text_block",
        }
    }
}

impl fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A normalized rectangle: every component in [0, 1] relative to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Construct bounds, clamping every component into [0, 1].
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            width: width.clamp(0.0, 1.0),
            height: height.clamp(0.0, 1.0),
        }
    }

    /// Full-frame bounds.
    pub fn full() -> Self {
        Self { x: 0.0, y: 0.0, width: 1.0, height: 1.0 }
    }

    /// Normalized area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Spatial match: all four component deltas strictly below `epsilon`.
    pub fn matches(&self, other: &Bounds, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.width - other.width).abs() < epsilon
            && (self.height - other.height).abs() < epsilon
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::full()
    }
}

/// A recognized unit of learner work. Replaced wholesale on update, never
/// mutated field-by-field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observable {
    pub id: String,
    pub kind: ObservableKind,
    pub content: String,
    pub bounds: Bounds,
    /// Recognition confidence in [0, 1].
    pub confidence: f64,
    #[serde(default)]
    pub metadata: FxHashMap<String, String>,
    pub created_at_ms: u64,
}

impl Observable {
    pub fn new(
        id: impl Into<String>,
        kind: ObservableKind,
        content: impl Into<String>,
        bounds: Bounds,
        confidence: f64,
        created_at_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            bounds,
            confidence: confidence.clamp(0.0, 1.0),
            metadata: FxHashMap::default(),
            created_at_ms,
        }
    }

    /// Successor observable at the same slot with new content and confidence.
    /// Keeps id, bounds, and creation time; metadata carries over.
    pub fn replaced_with(&self, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            content: content.into(),
            bounds: self.bounds,
            confidence: confidence.clamp(0.0, 1.0),
            metadata: self.metadata.clone(),
            created_at_ms: self.created_at_ms,
        }
    }
}
