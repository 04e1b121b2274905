// traits.rs - Core traits for pluggable community indices

use std::fmt::Debug;

/// Diversity index over an abundance vector
pub trait DiversityIndex: Send + Sync + Debug {
    /// Compute the index; zero entries are ignored
    fn compute(&self, abundances: &[f64]) -> f64;

    /// Get a human-readable name for this index
    fn name(&self) -> &'static str;

    /// Get a description of this index
    fn description(&self) -> &'static str;
}

/// Dissimilarity coefficient between two abundance vectors
pub trait DissimilarityIndex: Send + Sync + Debug {
    /// Dissimilarity in [0, 1]; None when undefined (e.g. both vectors all zero)
    fn dissimilarity(&self, a: &[f64], b: &[f64]) -> Option<f64>;

    /// Similarity as one minus the dissimilarity
    fn similarity(&self, a: &[f64], b: &[f64]) -> Option<f64> {
        self.dissimilarity(a, b).map(|d| 1.0 - d)
    }

    /// Get a human-readable name for this index
    fn name(&self) -> &'static str;

    /// Get a description of this index
    fn description(&self) -> &'static str;
}

/// Relative abundances of the non-zero entries; empty when the total is zero
pub(crate) fn proportions(abundances: &[f64]) -> Vec<f64> {
    let total: f64 = abundances.iter().filter(|&&x| x > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    abundances
        .iter()
        .filter(|&&x| x > 0.0)
        .map(|&x| x / total)
        .collect()
}
