// jaccard.rs - Quantitative Jaccard dissimilarity

use super::bray_curtis::BrayCurtis;
use super::traits::DissimilarityIndex;

/// Quantitative Jaccard, 2B / (1 + B) where B is Bray-Curtis
#[derive(Debug, Clone, Copy)]
pub struct Jaccard;

impl DissimilarityIndex for Jaccard {
    fn dissimilarity(&self, a: &[f64], b: &[f64]) -> Option<f64> {
        BrayCurtis
            .dissimilarity(a, b)
            .map(|bray| 2.0 * bray / (1.0 + bray))
    }

    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn description(&self) -> &'static str {
        "Quantitative Jaccard derived from Bray-Curtis"
    }
}
