// threshold.rs - Minimum sample size reaching a cumulative-percentage threshold

use crate::core::accumulation::AccumulationCurve;
use crate::core::bootstrap::DiversityCurve;
use crate::core::similarity::SimilarityCurve;
use serde::Serialize;

/// Default thresholds, in percent
pub const DEFAULT_THRESHOLDS: [f64; 3] = [70.0, 80.0, 90.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThresholdOutcome {
    Reached {
        sample_size: usize,
        cumulative_pct: f64,
    },
    NotReached,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRecord {
    pub threshold: f64,
    pub outcome: ThresholdOutcome,
}

impl ThresholdRecord {
    /// "70%", "82.5%"
    pub fn label(&self) -> String {
        format!("{}%", self.threshold)
    }
}

/// A curve that can be summarised as (sample size, cumulative percentage) rows
pub trait CumulativeCurve {
    fn metric(&self) -> &'static str;

    /// Rows with a defined cumulative percentage
    fn cumulative(&self) -> Vec<(usize, f64)>;
}

impl CumulativeCurve for AccumulationCurve {
    fn metric(&self) -> &'static str {
        "accumulation"
    }

    fn cumulative(&self) -> Vec<(usize, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.cumulative_pct.map(|pct| (p.checklists, pct)))
            .collect()
    }
}

impl CumulativeCurve for SimilarityCurve {
    fn metric(&self) -> &'static str {
        "similarity"
    }

    fn cumulative(&self) -> Vec<(usize, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.cumulative_pct.map(|pct| (p.checklists, pct)))
            .collect()
    }
}

impl CumulativeCurve for DiversityCurve {
    fn metric(&self) -> &'static str {
        "diversity"
    }

    fn cumulative(&self) -> Vec<(usize, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.cumulative_pct.map(|pct| (p.checklists, pct)))
            .collect()
    }
}

/// For each threshold, the smallest sample size whose cumulative percentage is
/// at least the threshold. Rows need not be ordered.
pub fn summarize_thresholds(curve: &[(usize, f64)], thresholds: &[f64]) -> Vec<ThresholdRecord> {
    thresholds
        .iter()
        .map(|&threshold| {
            let outcome = curve
                .iter()
                .filter(|(_, pct)| *pct >= threshold)
                .min_by_key(|(size, _)| *size)
                .map(|&(sample_size, cumulative_pct)| ThresholdOutcome::Reached {
                    sample_size,
                    cumulative_pct,
                })
                .unwrap_or(ThresholdOutcome::NotReached);
            ThresholdRecord { threshold, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_curve() {
        let curve = [(1, 50.0), (2, 65.0), (3, 72.0), (4, 91.0)];
        let records = summarize_thresholds(&curve, &[70.0, 80.0, 90.0, 95.0]);

        assert_eq!(
            records[0].outcome,
            ThresholdOutcome::Reached { sample_size: 3, cumulative_pct: 72.0 }
        );
        assert_eq!(
            records[1].outcome,
            ThresholdOutcome::Reached { sample_size: 4, cumulative_pct: 91.0 }
        );
        assert_eq!(
            records[2].outcome,
            ThresholdOutcome::Reached { sample_size: 4, cumulative_pct: 91.0 }
        );
        assert_eq!(records[3].outcome, ThresholdOutcome::NotReached);
        assert_eq!(records[0].label(), "70%");
    }

    #[test]
    fn test_exact_threshold_qualifies() {
        let records = summarize_thresholds(&[(5, 80.0)], &[80.0]);
        assert_eq!(
            records[0].outcome,
            ThresholdOutcome::Reached { sample_size: 5, cumulative_pct: 80.0 }
        );
    }

    #[test]
    fn test_non_monotone_picks_smallest_size() {
        // A noisy curve can cross and dip back
        let curve = [(3, 85.0), (1, 60.0), (2, 71.0), (4, 69.0)];
        let records = summarize_thresholds(&curve, &DEFAULT_THRESHOLDS);
        assert_eq!(
            records[0].outcome,
            ThresholdOutcome::Reached { sample_size: 2, cumulative_pct: 71.0 }
        );
        assert_eq!(records[2].outcome, ThresholdOutcome::NotReached);
    }

    #[test]
    fn test_empty_curve() {
        let records = summarize_thresholds(&[], &DEFAULT_THRESHOLDS);
        assert!(records.iter().all(|r| r.outcome == ThresholdOutcome::NotReached));
    }
}
