// shannon.rs - Shannon entropy

use super::traits::{proportions, DiversityIndex};

/// Shannon index H = −Σ p ln p (natural logarithm)
#[derive(Debug, Clone, Copy)]
pub struct Shannon;

impl DiversityIndex for Shannon {
    fn compute(&self, abundances: &[f64]) -> f64 {
        let h: f64 = proportions(abundances).iter().map(|p| -p * p.ln()).sum();
        // -0.0 for a single species
        h.max(0.0)
    }

    fn name(&self) -> &'static str {
        "shannon"
    }

    fn description(&self) -> &'static str {
        "Shannon entropy, natural log"
    }
}
