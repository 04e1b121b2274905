// bootstrap.rs - Bootstrapped diversity against number of checklists

use crate::core::progress::{sweep_progress, update_interval};
use crate::core::rng::{iteration_rng, STREAM_BOOTSTRAP};
use crate::core::stats::{mean, percent_of, quantile_sorted, sample_sd};
use crate::data::CommunityMatrix;
use crate::error::{AnalysisError, Result};
use crate::indices::DiversityIndex;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct DiversityPoint {
    pub checklists: usize,
    pub mean: f64,
    pub sd: f64,
    /// sd / mean; None when the mean is 0
    pub cv: Option<f64>,
    pub lower_2_5: f64,
    pub upper_97_5: f64,
    /// Mean as a percentage of the mean at the full sample size
    pub cumulative_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiversityCurve {
    pub locality: String,
    pub index: String,
    pub repetitions: usize,
    pub points: Vec<DiversityPoint>,
}

/// Pick the locality to bootstrap: the configured one, or the only one present
pub fn resolve_locality<'a>(
    matrix: &'a CommunityMatrix,
    requested: Option<&'a str>,
) -> Result<&'a str> {
    let localities = matrix.locality_ids();
    match requested {
        Some(id) if localities.contains(id) => Ok(id),
        Some(id) => Err(AnalysisError::UnknownLocality(id.to_string())),
        None => match localities.len() {
            0 => Err(AnalysisError::EmptyAfterFiltering {
                stage: "locality selection".to_string(),
            }),
            1 => Ok(localities.into_iter().next().unwrap_or_default()),
            n => Err(AnalysisError::AmbiguousLocality(n)),
        },
    }
}

/// Diversity of one bootstrap sample of `n` checklist draws.
///
/// Draws are with replacement; observations are restricted to the distinct drawn
/// checklists, and each species contributes its mean count over the drawn
/// checklists on which it was recorded.
fn sample_diversity<R: Rng + ?Sized>(
    rng: &mut R,
    presence: &[Vec<(usize, f64)>],
    n_species: usize,
    n: usize,
    index: &dyn DiversityIndex,
    drawn: &mut [bool],
) -> f64 {
    drawn.iter_mut().for_each(|d| *d = false);
    for _ in 0..n {
        drawn[rng.gen_range(0..presence.len())] = true;
    }

    let mut sums = vec![0.0; n_species];
    let mut seen = vec![0usize; n_species];
    for (row, _) in drawn.iter().enumerate().filter(|(_, &d)| d) {
        for &(j, count) in &presence[row] {
            sums[j] += count;
            seen[j] += 1;
        }
    }
    let means: Vec<f64> = sums
        .iter()
        .zip(&seen)
        .filter(|(_, &s)| s > 0)
        .map(|(sum, &s)| sum / s as f64)
        .collect();
    index.compute(&means)
}

/// Bootstrap distribution of a diversity index for every sample size 1..=N at one
/// locality.
pub fn bootstrap_diversity(
    matrix: &CommunityMatrix,
    locality: Option<&str>,
    index: &dyn DiversityIndex,
    repetitions: usize,
    seed: u64,
) -> Result<DiversityCurve> {
    let locality = resolve_locality(matrix, locality)?.to_string();
    let local = matrix.for_locality(&locality)?;
    let n_total = local.n_checklists();
    let repetitions = repetitions.max(1);
    let presence: Vec<Vec<(usize, f64)>> = local
        .counts
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(_, &v)| v > 0.0)
                .map(|(j, &v)| (j, v))
                .collect()
        })
        .collect();

    println!(
        "🔄 Bootstrap diversity ({}) at {}: n = 1..{} × {} repetitions",
        index.name(),
        locality,
        n_total,
        repetitions
    );
    let start = Instant::now();
    let pb = sweep_progress(repetitions);
    let interval = update_interval(repetitions);
    let done = AtomicUsize::new(0);

    let sweeps: Vec<Vec<f64>> = (0..repetitions)
        .into_par_iter()
        .map(|r| {
            let mut rng = iteration_rng(seed, STREAM_BOOTSTRAP, r as u64);
            let mut drawn = vec![false; n_total];
            let sweep: Vec<f64> = (1..=n_total)
                .map(|n| {
                    sample_diversity(
                        &mut rng,
                        &presence,
                        local.n_species(),
                        n,
                        index,
                        &mut drawn,
                    )
                })
                .collect();

            let count = done.fetch_add(1, Ordering::Relaxed) + 1;
            if count % interval == 0 {
                pb.set_position(count as u64);
            }
            sweep
        })
        .collect();
    pb.finish_and_clear();

    let mut points: Vec<DiversityPoint> = (0..n_total)
        .map(|i| {
            let mut values: Vec<f64> = sweeps.iter().map(|s| s[i]).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            let m = mean(&values).unwrap_or(0.0);
            let sd = sample_sd(&values).unwrap_or(0.0);
            DiversityPoint {
                checklists: i + 1,
                mean: m,
                sd,
                cv: if m > 0.0 { Some(sd / m) } else { None },
                lower_2_5: quantile_sorted(&values, 0.025).unwrap_or(0.0),
                upper_97_5: quantile_sorted(&values, 0.975).unwrap_or(0.0),
                cumulative_pct: None,
            }
        })
        .collect();

    let reference = points.last().map(|p| p.mean).unwrap_or(0.0);
    for point in &mut points {
        point.cumulative_pct = percent_of(point.mean, reference);
    }

    println!(
        "✅ Bootstrap diversity done in {:.2}s ({} at n = {}: {:.3})",
        start.elapsed().as_secs_f64(),
        index.name(),
        n_total,
        reference
    );

    Ok(DiversityCurve {
        locality,
        index: index.name().to_string(),
        repetitions,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indices::Shannon;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::{BTreeMap, HashMap};

    fn matrix_from(rows: &[(&str, &str, &[(&str, f64)])]) -> CommunityMatrix {
        let counts: BTreeMap<String, BTreeMap<String, f64>> = rows
            .iter()
            .map(|(id, _, species)| {
                (
                    id.to_string(),
                    species.iter().map(|(s, c)| (s.to_string(), *c)).collect(),
                )
            })
            .collect();
        let localities: HashMap<String, String> = rows
            .iter()
            .map(|(id, loc, _)| (id.to_string(), loc.to_string()))
            .collect();
        CommunityMatrix::from_counts(&counts, &localities)
    }

    fn park() -> CommunityMatrix {
        matrix_from(&[
            ("S1", "L1", &[("A", 4.0), ("B", 1.0)]),
            ("S2", "L1", &[("A", 2.0), ("C", 2.0)]),
            ("S3", "L1", &[("B", 3.0), ("C", 1.0), ("D", 1.0)]),
            ("S4", "L1", &[("A", 1.0)]),
            ("S5", "L2", &[("E", 9.0)]),
        ])
    }

    #[test]
    fn test_single_species_gives_zero_diversity() {
        let matrix = matrix_from(&[
            ("S1", "L1", &[("A", 4.0)]),
            ("S2", "L1", &[("A", 1.0)]),
            ("S3", "L1", &[("A", 7.0)]),
        ]);
        let curve = bootstrap_diversity(&matrix, Some("L1"), &Shannon, 50, 1).unwrap();
        assert_eq!(curve.points.len(), 3);
        for p in &curve.points {
            assert_eq!(p.mean, 0.0);
            assert!(p.cv.is_none());
        }
    }

    #[test]
    fn test_curve_shape_and_bounds() {
        let curve = bootstrap_diversity(&park(), Some("L1"), &Shannon, 200, 9).unwrap();
        assert_eq!(curve.locality, "L1");
        assert_eq!(curve.points.len(), 4);

        let first = &curve.points[0];
        assert!(first.mean >= 0.0);
        for p in &curve.points {
            assert!(p.lower_2_5 <= p.mean + 1e-12);
            assert!(p.upper_97_5 + 1e-12 >= p.mean);
            assert!(p.sd >= 0.0);
        }
        let last = curve.points.last().unwrap();
        assert!((last.cumulative_pct.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_draws_collapse() {
        let local = park().for_locality("L1").unwrap();
        let presence: Vec<Vec<(usize, f64)>> = local
            .counts
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &v)| v > 0.0)
                    .map(|(j, &v)| (j, v))
                    .collect()
            })
            .collect();
        // One-row presence table: every draw hits S1, so n draws equal one draw
        let single = vec![presence[0].clone()];
        let mut drawn = vec![false; 1];
        let mut rng = SmallRng::seed_from_u64(4);
        let one = sample_diversity(&mut rng, &single, local.n_species(), 1, &Shannon, &mut drawn);
        let many = sample_diversity(&mut rng, &single, local.n_species(), 10, &Shannon, &mut drawn);
        assert_eq!(one, many);
        // A: 4, B: 1
        let expected = Shannon.compute(&[4.0, 1.0]);
        assert!((one - expected).abs() < 1e-12);
    }

    #[test]
    fn test_locality_resolution() {
        let matrix = park();
        assert!(matches!(
            bootstrap_diversity(&matrix, Some("L404"), &Shannon, 5, 1),
            Err(AnalysisError::UnknownLocality(_))
        ));
        assert!(matches!(
            bootstrap_diversity(&matrix, None, &Shannon, 5, 1),
            Err(AnalysisError::AmbiguousLocality(2))
        ));
        let only_l1 = matrix.for_locality("L1").unwrap();
        assert_eq!(resolve_locality(&only_l1, None).unwrap(), "L1");
    }
}
