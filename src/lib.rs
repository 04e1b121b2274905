// lib.rs - birdeffort library root

//! # birdeffort - Sampling-effort sufficiency for eBird checklists
//!
//! This library cleans eBird observation exports for one locality and answers
//! "how many checklists are enough?" with three resampling curves: species
//! accumulation, similarity decay between pooled checklist groups, and
//! bootstrapped diversity. Each curve is reduced to the smallest sample size
//! reaching 70/80/90% of its reference value.
//!
//! ## Features
//!
//! - **Reproducible**: every random draw comes from an explicit seed
//! - **Parallel**: permutation sweeps run on rayon with per-iteration generators
//! - **Plugin indices**: Bray-Curtis and Jaccard dissimilarity, Shannon and Simpson diversity
//! - **Two variants**: all species, and species recorded on at least 5% of checklists
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use birdeffort::prelude::*;
//!
//! let raw = load_observations(
//!     std::path::Path::new("ebd_park.txt"),
//!     &ColumnMap::default(),
//!     None,  // delimiter from extension
//! )?;
//!
//! let settings = AnalysisSettings {
//!     seed: 2024,
//!     ..Default::default()
//! };
//! for report in run_analysis(&raw, &settings)? {
//!     report.print_thresholds();
//! }
//! # Ok::<(), birdeffort::AnalysisError>(())
//! ```

// Re-export all main modules
pub mod cleaning;
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod indices;
pub mod output;
pub mod pipeline;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cleaning::{clean, CleanedDataset, CleaningConfig, CleaningReport, Variant};
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{bootstrap_diversity, similarity_decay, species_accumulation};
    pub use crate::core::{summarize_thresholds, ThresholdOutcome, ThresholdRecord};
    pub use crate::core::{AccumulationCurve, DiversityCurve, RichnessEstimator, SimilarityCurve};
    pub use crate::data::loaders::{load_observations, ColumnMap, ColumnStyle};
    pub use crate::data::{CommunityMatrix, RawObservation};
    pub use crate::error::{AnalysisError, Result};
    pub use crate::indices::{DissimilarityIndex, DiversityIndex, IndexRegistry};
    pub use crate::output::{write_summary_json, write_variant_tables, OutputFormat};
    pub use crate::pipeline::{run_analysis, run_variant, AnalysisSettings, VariantReport};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{RichnessEstimator, ThresholdOutcome};
pub use data::{CommunityMatrix, RawObservation};
pub use error::AnalysisError;
pub use pipeline::{AnalysisSettings, VariantReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "birdeffort v{} - Sampling-effort sufficiency for eBird checklists",
        VERSION
    )
}
