// pipeline.rs - Clean, build the matrix and run every metric engine per variant

use crate::cleaning::{clean, CleaningConfig, CleaningReport, Variant};
use crate::core::{
    bootstrap_diversity, similarity_decay, species_accumulation, summarize_thresholds,
    AccumulationCurve, CumulativeCurve, DiversityCurve, RichnessEstimator, SimilarityCurve,
    SpeciesPool, ThresholdOutcome, ThresholdRecord, DEFAULT_THRESHOLDS,
};
use crate::data::RawObservation;
use crate::error::Result;
use crate::indices::IndexRegistry;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Instant;

/// Everything the analysis needs besides the raw observations
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub cleaning: CleaningConfig,
    pub accumulation_permutations: usize,
    pub similarity_permutations: usize,
    pub bootstrap_repetitions: usize,
    pub estimator: RichnessEstimator,
    pub dissimilarity: String,
    pub diversity_index: String,
    pub disjoint_groups: bool,
    pub thresholds: Vec<f64>,
    pub seed: u64,
    /// Also run the rare-species-trimmed variant
    pub frequent_variant: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            cleaning: CleaningConfig::default(),
            accumulation_permutations: 1000,
            similarity_permutations: 1000,
            bootstrap_repetitions: 1000,
            estimator: RichnessEstimator::Chao,
            dissimilarity: "bray".to_string(),
            diversity_index: "shannon".to_string(),
            disjoint_groups: false,
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            seed: 42,
            frequent_variant: true,
        }
    }
}

/// Serializable view of the settings, recorded in the JSON summary
#[derive(Debug, Serialize)]
pub struct SettingsDigest<'a> {
    pub locality: Option<&'a str>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub protocols: &'a [String],
    pub min_duration: f64,
    pub max_duration: f64,
    pub max_distance_km: f64,
    pub trim_pct: f64,
    pub group_pattern: Option<&'a str>,
    pub accumulation_permutations: usize,
    pub similarity_permutations: usize,
    pub bootstrap_repetitions: usize,
    pub estimator: &'static str,
    pub dissimilarity: &'a str,
    pub diversity_index: &'a str,
    pub disjoint_groups: bool,
    pub thresholds: &'a [f64],
    pub seed: u64,
    pub frequent_variant: bool,
}

impl AnalysisSettings {
    pub fn digest(&self) -> SettingsDigest<'_> {
        let cleaning = &self.cleaning;
        SettingsDigest {
            locality: cleaning.locality.as_deref(),
            year_min: cleaning.year_min,
            year_max: cleaning.year_max,
            protocols: &cleaning.protocols,
            min_duration: cleaning.min_duration,
            max_duration: cleaning.max_duration,
            max_distance_km: cleaning.max_distance_km,
            trim_pct: cleaning.trim_pct,
            group_pattern: cleaning.group_pattern.as_ref().map(|re| re.as_str()),
            accumulation_permutations: self.accumulation_permutations,
            similarity_permutations: self.similarity_permutations,
            bootstrap_repetitions: self.bootstrap_repetitions,
            estimator: self.estimator.name(),
            dissimilarity: &self.dissimilarity,
            diversity_index: &self.diversity_index,
            disjoint_groups: self.disjoint_groups,
            thresholds: &self.thresholds,
            seed: self.seed,
            frequent_variant: self.frequent_variant,
        }
    }
}

/// Threshold records for one metric curve
#[derive(Debug, Clone, Serialize)]
pub struct MetricThresholds {
    pub metric: &'static str,
    pub records: Vec<ThresholdRecord>,
}

impl MetricThresholds {
    fn from_curve<C: CumulativeCurve>(curve: &C, thresholds: &[f64]) -> Self {
        Self {
            metric: curve.metric(),
            records: summarize_thresholds(&curve.cumulative(), thresholds),
        }
    }
}

/// Curves and threshold summaries for one cleaned dataset
#[derive(Debug, Clone)]
pub struct VariantReport {
    pub variant: Variant,
    pub cleaning: CleaningReport,
    pub accumulation: AccumulationCurve,
    pub similarity: SimilarityCurve,
    pub diversity: DiversityCurve,
    pub thresholds: Vec<MetricThresholds>,
}

/// JSON-friendly digest of one variant
#[derive(Debug, Serialize)]
pub struct VariantSummary<'a> {
    pub variant: &'static str,
    pub cleaning: &'a CleaningReport,
    pub species_pool: &'a SpeciesPool,
    pub estimator: &'static str,
    pub dissimilarity: &'a str,
    pub diversity_index: &'a str,
    pub diversity_locality: &'a str,
    pub thresholds: &'a [MetricThresholds],
}

impl VariantReport {
    pub fn summary(&self) -> VariantSummary<'_> {
        VariantSummary {
            variant: self.variant.label(),
            cleaning: &self.cleaning,
            species_pool: &self.accumulation.pool,
            estimator: self.accumulation.estimator.name(),
            dissimilarity: &self.similarity.index,
            diversity_index: &self.diversity.index,
            diversity_locality: &self.diversity.locality,
            thresholds: &self.thresholds,
        }
    }

    /// Print the threshold table to the console
    pub fn print_thresholds(&self) {
        println!("\n📏 Sample sizes reaching thresholds ({} species):", self.variant.label());
        for metric in &self.thresholds {
            let cells: Vec<String> = metric
                .records
                .iter()
                .map(|r| match r.outcome {
                    ThresholdOutcome::Reached { sample_size, .. } => {
                        format!("{}: {}", r.label(), sample_size)
                    }
                    ThresholdOutcome::NotReached => {
                        format!("{}: not reached", r.label())
                    }
                })
                .collect();
            println!("  • {:<13} {}", metric.metric, cells.join(", "));
        }
    }
}

/// Clean one variant and run the three engines on it
pub fn run_variant(
    raw: &[RawObservation],
    settings: &AnalysisSettings,
    registry: &IndexRegistry,
    variant: Variant,
) -> Result<VariantReport> {
    let dissimilarity = registry.dissimilarity(&settings.dissimilarity)?;
    let diversity = registry.diversity(&settings.diversity_index)?;

    // Same seed per variant: both variants keep the same group representatives
    let mut rng = SmallRng::seed_from_u64(settings.seed);
    let dataset = clean(raw, &settings.cleaning, variant, &mut rng)?;
    let matrix = dataset.to_matrix();

    println!(
        "\n🔄 Running metric engines on {} checklists × {} species ({})",
        matrix.n_checklists(),
        matrix.n_species(),
        variant.label()
    );

    let accumulation = species_accumulation(
        &matrix,
        settings.accumulation_permutations,
        settings.estimator,
        settings.seed,
    )?;
    let similarity = similarity_decay(
        &matrix,
        dissimilarity,
        settings.similarity_permutations,
        settings.disjoint_groups,
        settings.seed,
    )?;
    let diversity = bootstrap_diversity(
        &matrix,
        settings.cleaning.locality.as_deref(),
        diversity,
        settings.bootstrap_repetitions,
        settings.seed,
    )?;

    let thresholds = vec![
        MetricThresholds::from_curve(&accumulation, &settings.thresholds),
        MetricThresholds::from_curve(&similarity, &settings.thresholds),
        MetricThresholds::from_curve(&diversity, &settings.thresholds),
    ];

    Ok(VariantReport {
        variant,
        cleaning: dataset.report,
        accumulation,
        similarity,
        diversity,
        thresholds,
    })
}

/// Run the all-species variant, then the frequent-species variant when enabled
pub fn run_analysis(
    raw: &[RawObservation],
    settings: &AnalysisSettings,
) -> Result<Vec<VariantReport>> {
    let registry = IndexRegistry::new();
    let mut variants = vec![Variant::AllSpecies];
    if settings.frequent_variant {
        variants.push(Variant::FrequentSpecies);
    }

    let mut reports = Vec::with_capacity(variants.len());
    for variant in variants {
        let start = Instant::now();
        let report = run_variant(raw, settings, &registry, variant)?;
        println!(
            "✅ {} species variant done in {:.2}s",
            variant.label(),
            start.elapsed().as_secs_f64()
        );
        reports.push(report);
    }
    Ok(reports)
}
