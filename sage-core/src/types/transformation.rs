//! Transformation events — the append-only change log.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::collections::FxHashMap;
use super::observable::{Bounds, ObservableKind};

/// How content at a slot changed between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationKind {
    /// After contains before plus new material.
    Add,
    /// Before contains after; material was erased.
    Remove,
    /// Content rewritten in place.
    Replace,
    /// Same tokens, different order.
    Reorder,
    /// Marks, underlines, margin notes.
    Annotate,
    /// Kind reassignment without a content edit.
    Classify,
}

impl TransformationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Reorder => "reorder",
            Self::Annotate => "annotate",
            Self::Classify => "classify",
        }
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One recorded change. Append-only: never edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationEvent {
    pub id: String,
    pub kind: TransformationKind,
    pub observable_id: String,
    pub observable_kind: ObservableKind,
    pub timestamp_ms: u64,
    pub before: String,
    pub after: String,
    pub bounds: Bounds,
    #[serde(default)]
    pub metadata: FxHashMap<String, String>,
}

impl TransformationEvent {
    pub fn new(
        id: impl Into<String>,
        kind: TransformationKind,
        observable_id: impl Into<String>,
        observable_kind: ObservableKind,
        timestamp_ms: u64,
        before: impl Into<String>,
        after: impl Into<String>,
        bounds: Bounds,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            observable_id: observable_id.into(),
            observable_kind,
            timestamp_ms,
            before: before.into(),
            after: after.into(),
            bounds,
            metadata: FxHashMap::default(),
        }
    }
}
