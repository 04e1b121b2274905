// bray_curtis.rs - Bray-Curtis dissimilarity

use super::traits::DissimilarityIndex;

/// Σ|a − b| / Σ(a + b)
#[derive(Debug, Clone, Copy)]
pub struct BrayCurtis;

impl DissimilarityIndex for BrayCurtis {
    fn dissimilarity(&self, a: &[f64], b: &[f64]) -> Option<f64> {
        let (diff, total) = a
            .iter()
            .zip(b)
            .fold((0.0, 0.0), |(diff, total), (x, y)| {
                (diff + (x - y).abs(), total + x + y)
            });
        if total > 0.0 {
            Some(diff / total)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "bray"
    }

    fn description(&self) -> &'static str {
        "Bray-Curtis count-based dissimilarity"
    }
}
