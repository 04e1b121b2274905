// similarity.rs - Similarity decay between pooled random checklist groups

use crate::core::progress::{sweep_progress, update_interval};
use crate::core::rng::{iteration_rng, STREAM_SIMILARITY};
use crate::core::stats::{mean, percent_of, sample_sd};
use crate::data::CommunityMatrix;
use crate::error::{AnalysisError, Result};
use crate::indices::DissimilarityIndex;
use rand::seq::index::sample;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityPoint {
    pub checklists: usize,
    /// None when every permutation compared two empty pools
    pub mean: Option<f64>,
    pub sd: Option<f64>,
    pub valid_permutations: usize,
    /// Mean as a percentage of the mean at the largest defined sample size
    pub cumulative_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityCurve {
    pub points: Vec<SimilarityPoint>,
    pub index: String,
    pub permutations: usize,
    pub disjoint_groups: bool,
}

impl SimilarityCurve {
    /// Mean similarity at the largest sample size with a defined value
    pub fn reference(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.mean)
    }
}

/// Draw the two groups compared for sample size `k`.
///
/// k = 1 draws two distinct checklists. For larger k each group is drawn without
/// replacement; the groups are independent unless `disjoint` is set.
fn draw_groups<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    k: usize,
    disjoint: bool,
) -> (Vec<usize>, Vec<usize>) {
    if k == 1 || disjoint {
        let mut drawn = sample(rng, n, 2 * k).into_vec();
        let second = drawn.split_off(k);
        (drawn, second)
    } else {
        (sample(rng, n, k).into_vec(), sample(rng, n, k).into_vec())
    }
}

/// Mean similarity between pooled groups of k checklists, for each k.
pub fn similarity_decay(
    matrix: &CommunityMatrix,
    index: &dyn DissimilarityIndex,
    permutations: usize,
    disjoint_groups: bool,
    seed: u64,
) -> Result<SimilarityCurve> {
    let n = matrix.n_checklists();
    if n < 2 {
        return Err(AnalysisError::InsufficientChecklists {
            engine: "similarity decay",
            required: 2,
            found: n,
        });
    }
    let permutations = permutations.max(1);
    let max_k = if disjoint_groups { n / 2 } else { n };

    println!(
        "🔄 Similarity decay ({}): k = 1..{} × {} permutations",
        index.name(),
        max_k,
        permutations
    );
    let start = Instant::now();
    let pb = sweep_progress(max_k);
    let interval = update_interval(max_k);
    let done = AtomicUsize::new(0);

    let per_k: Vec<(Option<f64>, Option<f64>, usize)> = (1..=max_k)
        .into_par_iter()
        .map(|k| {
            let mut rng = iteration_rng(seed, STREAM_SIMILARITY, k as u64);
            let values: Vec<f64> = (0..permutations)
                .filter_map(|_| {
                    let (a, b) = draw_groups(&mut rng, n, k, disjoint_groups);
                    index.similarity(&matrix.pooled(a), &matrix.pooled(b))
                })
                .collect();

            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            if count % interval == 0 {
                pb.set_position(count as u64);
            }
            (mean(&values), sample_sd(&values), values.len())
        })
        .collect();
    pb.finish_and_clear();

    let mut curve = SimilarityCurve {
        points: per_k
            .into_iter()
            .enumerate()
            .map(|(i, (mean, sd, valid))| SimilarityPoint {
                checklists: i + 1,
                mean,
                sd,
                valid_permutations: valid,
                cumulative_pct: None,
            })
            .collect(),
        index: index.name().to_string(),
        permutations,
        disjoint_groups,
    };

    let reference = curve.reference();
    for point in &mut curve.points {
        point.cumulative_pct = match (point.mean, reference) {
            (Some(m), Some(r)) => percent_of(m, r),
            _ => None,
        };
    }

    let skipped: usize = curve
        .points
        .iter()
        .map(|p| permutations - p.valid_permutations)
        .sum();
    if skipped > 0 {
        eprintln!(
            "⚠️  {} permutations compared two empty pools and were excluded",
            skipped
        );
    }
    println!(
        "✅ Similarity decay done in {:.2}s (reference similarity {})",
        start.elapsed().as_secs_f64(),
        reference.map_or("NA".to_string(), |r| format!("{:.3}", r))
    );

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::BrayCurtis;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashMap};

    fn matrix_from(rows: &[(&str, &[(&str, f64)])]) -> CommunityMatrix {
        let counts: BTreeMap<String, BTreeMap<String, f64>> = rows
            .iter()
            .map(|(id, species)| {
                (
                    id.to_string(),
                    species.iter().map(|(s, c)| (s.to_string(), *c)).collect(),
                )
            })
            .collect();
        CommunityMatrix::from_counts(&counts, &HashMap::new())
    }

    fn overlapping() -> CommunityMatrix {
        matrix_from(&[
            ("S1", &[("A", 3.0), ("B", 1.0)]),
            ("S2", &[("A", 1.0), ("C", 2.0)]),
            ("S3", &[("B", 2.0), ("C", 1.0)]),
            ("S4", &[("A", 2.0), ("D", 1.0)]),
            ("S5", &[("B", 1.0), ("D", 2.0)]),
            ("S6", &[("A", 1.0), ("B", 1.0), ("C", 1.0)]),
        ])
    }

    #[test]
    fn test_draw_groups_sizes() {
        let mut rng = SmallRng::seed_from_u64(5);
        let (a, b) = draw_groups(&mut rng, 6, 1, false);
        assert_eq!((a.len(), b.len()), (1, 1));
        assert_ne!(a[0], b[0]);

        let (a, b) = draw_groups(&mut rng, 6, 3, true);
        assert_eq!((a.len(), b.len()), (3, 3));
        assert!(a.iter().all(|i| !b.contains(i)));

        let (a, b) = draw_groups(&mut rng, 6, 6, false);
        assert_eq!(a.len(), 6);
        assert_eq!(b.len(), 6);
    }

    #[test]
    fn test_similarity_increases_with_pool_size() {
        let matrix = overlapping();
        let curve = similarity_decay(&matrix, &BrayCurtis, 300, false, 11).unwrap();

        assert_eq!(curve.points.len(), 6);
        let first = curve.points[0].mean.unwrap();
        let last = curve.points.last().unwrap().mean.unwrap();
        assert!(first <= last);
        // Both groups are the full set at k = N
        assert!((last - 1.0).abs() < 1e-12);
        assert!((curve.points.last().unwrap().cumulative_pct.unwrap() - 100.0).abs() < 1e-9);
        for p in &curve.points {
            let m = p.mean.unwrap();
            assert!((0.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn test_disjoint_groups_stop_at_half() {
        let matrix = overlapping();
        let curve = similarity_decay(&matrix, &BrayCurtis, 50, true, 3).unwrap();
        assert_eq!(curve.points.len(), 3);
        assert!(curve.disjoint_groups);
    }

    #[test]
    fn test_empty_pools_are_excluded() {
        // Both checklists carry only zero counts
        let matrix = matrix_from(&[
            ("S1", &[("A", 0.0)]),
            ("S2", &[("A", 0.0)]),
        ]);
        let curve = similarity_decay(&matrix, &BrayCurtis, 20, false, 1).unwrap();
        assert!(curve.points.iter().all(|p| p.mean.is_none()));
        assert!(curve.points.iter().all(|p| p.valid_permutations == 0));
        assert!(curve.reference().is_none());
    }

    #[test]
    fn test_needs_two_checklists() {
        let matrix = matrix_from(&[("S1", &[("A", 1.0)])]);
        assert!(similarity_decay(&matrix, &BrayCurtis, 10, false, 1).is_err());
    }
}
