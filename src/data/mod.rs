// mod.rs - Data structures module

pub mod loaders;
pub mod matrix;
pub mod observation;

// Re-export main types for convenience
pub use matrix::CommunityMatrix;
pub use observation::{Category, Checklist, ObservationCount, RawObservation};
