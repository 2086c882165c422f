//! Hash collections used throughout the workspace.
//!
//! FxHash is a non-cryptographic hasher; all keys here are short strings or
//! small enums, never attacker-controlled.

pub use rustc_hash::{FxHashMap, FxHashSet};
