// simpson.rs - Simpson family of diversity indices

use super::traits::{proportions, DiversityIndex};

fn dominance(abundances: &[f64]) -> Option<f64> {
    let p = proportions(abundances);
    if p.is_empty() {
        None
    } else {
        Some(p.iter().map(|x| x * x).sum())
    }
}

/// Gini–Simpson index 1 − Σ p²
#[derive(Debug, Clone, Copy)]
pub struct Simpson;

impl DiversityIndex for Simpson {
    fn compute(&self, abundances: &[f64]) -> f64 {
        dominance(abundances).map(|d| 1.0 - d).unwrap_or(0.0)
    }

    fn name(&self) -> &'static str {
        "simpson"
    }

    fn description(&self) -> &'static str {
        "Gini-Simpson 1 - sum(p^2)"
    }
}

/// Inverse Simpson index 1 / Σ p²
#[derive(Debug, Clone, Copy)]
pub struct InverseSimpson;

impl DiversityIndex for InverseSimpson {
    fn compute(&self, abundances: &[f64]) -> f64 {
        dominance(abundances).map(|d| 1.0 / d).unwrap_or(0.0)
    }

    fn name(&self) -> &'static str {
        "invsimpson"
    }

    fn description(&self) -> &'static str {
        "Inverse Simpson 1 / sum(p^2)"
    }
}
