// accumulation.rs - Species accumulation curves and species-pool estimators

use crate::core::progress::{sweep_progress, update_interval};
use crate::core::rng::{iteration_rng, STREAM_ACCUMULATION};
use crate::core::stats::{mean, percent_of, sample_sd};
use crate::data::CommunityMatrix;
use crate::error::{AnalysisError, Result};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::Serialize;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Incidence-based estimator of the total species pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RichnessEstimator {
    Chao,
    Jack1,
    Jack2,
    Bootstrap,
}

impl RichnessEstimator {
    pub fn name(&self) -> &'static str {
        match self {
            RichnessEstimator::Chao => "chao",
            RichnessEstimator::Jack1 => "jack1",
            RichnessEstimator::Jack2 => "jack2",
            RichnessEstimator::Bootstrap => "bootstrap",
        }
    }
}

impl FromStr for RichnessEstimator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chao" => Ok(RichnessEstimator::Chao),
            "jack1" | "jackknife1" => Ok(RichnessEstimator::Jack1),
            "jack2" | "jackknife2" => Ok(RichnessEstimator::Jack2),
            "boot" | "bootstrap" => Ok(RichnessEstimator::Bootstrap),
            _ => Err(format!(
                "Invalid richness estimator '{}'. Use: chao, jack1, jack2, bootstrap",
                s
            )),
        }
    }
}

/// Species-pool estimates for a whole matrix
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesPool {
    pub observed: usize,
    pub checklists: usize,
    /// Species on exactly one checklist
    pub singletons: usize,
    /// Species on exactly two checklists
    pub doubletons: usize,
    pub chao: f64,
    pub jack1: f64,
    pub jack2: f64,
    pub bootstrap: f64,
}

impl SpeciesPool {
    pub fn from_matrix(matrix: &CommunityMatrix) -> Result<Self> {
        let n_checklists = matrix.n_checklists();
        if n_checklists < 2 {
            return Err(AnalysisError::InsufficientChecklists {
                engine: "species accumulation",
                required: 2,
                found: n_checklists,
            });
        }

        let incidence: Vec<usize> = matrix.incidence().into_iter().filter(|&f| f > 0).collect();
        let s = incidence.len() as f64;
        let n = n_checklists as f64;
        let a1 = incidence.iter().filter(|&&f| f == 1).count();
        let a2 = incidence.iter().filter(|&&f| f == 2).count();
        let (a1f, a2f) = (a1 as f64, a2 as f64);

        let chao = if a2 > 0 {
            s + a1f * a1f / (2.0 * a2f) * (n - 1.0) / n
        } else {
            s + a1f * (a1f - 1.0) / 2.0 * (n - 1.0) / n
        };
        let jack1 = s + a1f * (n - 1.0) / n;
        let jack2 = s + a1f * (2.0 * n - 3.0) / n - a2f * (n - 2.0) * (n - 2.0) / (n * (n - 1.0));
        let bootstrap = s + incidence
            .iter()
            .map(|&f| (1.0 - f as f64 / n).powf(n))
            .sum::<f64>();

        Ok(Self {
            observed: incidence.len(),
            checklists: n_checklists,
            singletons: a1,
            doubletons: a2,
            chao,
            jack1,
            jack2,
            bootstrap,
        })
    }

    pub fn estimate(&self, estimator: RichnessEstimator) -> f64 {
        match estimator {
            RichnessEstimator::Chao => self.chao,
            RichnessEstimator::Jack1 => self.jack1,
            RichnessEstimator::Jack2 => self.jack2,
            RichnessEstimator::Bootstrap => self.bootstrap,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccumulationPoint {
    pub checklists: usize,
    pub mean_richness: f64,
    pub sd: f64,
    /// Mean richness as a percentage of the asymptotic estimate
    pub cumulative_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccumulationCurve {
    pub points: Vec<AccumulationPoint>,
    pub pool: SpeciesPool,
    pub estimator: RichnessEstimator,
    pub permutations: usize,
}

impl AccumulationCurve {
    pub fn asymptote(&self) -> f64 {
        self.pool.estimate(self.estimator)
    }
}

/// Running distinct-species count along one checklist ordering
fn accumulate(presence: &[Vec<usize>], order: &[usize], n_species: usize) -> Vec<f64> {
    let mut seen = vec![false; n_species];
    let mut richness = 0usize;
    order
        .iter()
        .map(|&row| {
            for &j in &presence[row] {
                if !seen[j] {
                    seen[j] = true;
                    richness += 1;
                }
            }
            richness as f64
        })
        .collect()
}

/// Expected richness against number of checklists by random permutation of
/// checklist order.
pub fn species_accumulation(
    matrix: &CommunityMatrix,
    permutations: usize,
    estimator: RichnessEstimator,
    seed: u64,
) -> Result<AccumulationCurve> {
    let pool = SpeciesPool::from_matrix(matrix)?;
    let n = matrix.n_checklists();
    let permutations = permutations.max(1);
    let presence = matrix.presence_lists();

    println!(
        "🔄 Species accumulation: {} checklists × {} permutations",
        n, permutations
    );
    let start = Instant::now();
    let pb = sweep_progress(permutations);
    let interval = update_interval(permutations);
    let done = AtomicUsize::new(0);

    let curves: Vec<Vec<f64>> = (0..permutations)
        .into_par_iter()
        .map(|p| {
            let mut rng = iteration_rng(seed, STREAM_ACCUMULATION, p as u64);
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(&mut rng);
            let curve = accumulate(&presence, &order, matrix.n_species());

            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            if count % interval == 0 {
                pb.set_position(count as u64);
            }
            curve
        })
        .collect();
    pb.finish_and_clear();

    let asymptote = pool.estimate(estimator);
    let points = (0..n)
        .map(|k| {
            let column: Vec<f64> = curves.iter().map(|c| c[k]).collect();
            let mean_richness = mean(&column).unwrap_or(0.0);
            AccumulationPoint {
                checklists: k + 1,
                mean_richness,
                sd: sample_sd(&column).unwrap_or(0.0),
                cumulative_pct: percent_of(mean_richness, asymptote),
            }
        })
        .collect();

    println!(
        "✅ Accumulation done in {:.2}s: observed {} species, {} estimate {:.1}",
        start.elapsed().as_secs_f64(),
        pool.observed,
        estimator.name(),
        asymptote
    );

    Ok(AccumulationCurve {
        points,
        pool,
        estimator,
        permutations,
    })
}
