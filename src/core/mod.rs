// mod.rs - Metric engines module

pub mod accumulation;
pub mod bootstrap;
pub mod progress;
pub mod rng;
pub mod similarity;
pub mod stats;
pub mod threshold;

// Re-export main types for convenience
pub use accumulation::{species_accumulation, AccumulationCurve, RichnessEstimator, SpeciesPool};
pub use bootstrap::{bootstrap_diversity, DiversityCurve};
pub use similarity::{similarity_decay, SimilarityCurve};
pub use threshold::{
    summarize_thresholds, CumulativeCurve, ThresholdOutcome, ThresholdRecord, DEFAULT_THRESHOLDS,
};
