//! Value types shared across the engine.

pub mod analysis;
pub mod collections;
pub mod observable;
pub mod state;
pub mod transformation;

pub use analysis::{
    AdapterAnalysis, InterventionKind, MeaningfulEvent, MeaningfulEventKind, StepValidation,
};
pub use observable::{Bounds, Observable, ObservableKind};
pub use state::ObservationState;
pub use transformation::{TransformationEvent, TransformationKind};
