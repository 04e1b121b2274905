// mod.rs - Checklist cleaning and quality filters

pub mod groups;
pub mod rare;

use crate::data::observation::{parse_date, Category, ObservationCount, RawObservation};
use crate::data::{Checklist, CommunityMatrix};
use crate::error::{AnalysisError, Result};
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

pub use groups::{deduplicate_groups, GroupSummary};
pub use rare::{is_frequent, trim_rare_species, RareTrimSummary};

/// Maximum number of malformed rows echoed to the console
const MALFORMED_EXAMPLES: usize = 5;

/// Which of the two cleaned datasets to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Variant {
    /// Every retained species
    AllSpecies,
    /// Rare species trimmed per locality
    FrequentSpecies,
}

impl Variant {
    pub fn label(&self) -> &'static str {
        match self {
            Variant::AllSpecies => "all",
            Variant::FrequentSpecies => "frequent",
        }
    }

    pub fn trims_rare_species(&self) -> bool {
        matches!(self, Variant::FrequentSpecies)
    }
}

/// Quality criteria applied to the raw observation table
#[derive(Debug, Clone)]
pub struct CleaningConfig {
    /// Restrict to one locality
    pub locality: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub protocols: Vec<String>,
    pub min_duration: f64,
    pub max_duration: f64,
    pub max_distance_km: f64,
    pub trim_pct: f64,
    pub group_pattern: Option<Regex>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            locality: None,
            year_min: None,
            year_max: None,
            protocols: vec![
                "Traveling".to_string(),
                "Stationary".to_string(),
                "Area".to_string(),
            ],
            min_duration: 5.0,
            max_duration: 240.0,
            max_distance_km: 10.0,
            trim_pct: 5.0,
            group_pattern: None,
        }
    }
}

impl CleaningConfig {
    fn protocol_allowed(&self, protocol: &str) -> bool {
        self.protocols
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(protocol.trim()))
    }

    fn year_allowed(&self, year: i32) -> bool {
        self.year_min.map_or(true, |min| year >= min) && self.year_max.map_or(true, |max| year <= max)
    }

    fn duration_allowed(&self, duration: Option<f64>) -> bool {
        duration.map_or(false, |d| d >= self.min_duration && d <= self.max_duration)
    }

    fn distance_allowed(&self, distance: Option<f64>) -> bool {
        distance.map_or(true, |d| d <= self.max_distance_km)
    }
}

/// Rows and checklists removed at each cleaning step
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    pub variant: Option<Variant>,
    pub input_rows: usize,
    pub malformed_rows: usize,
    pub malformed_examples: Vec<String>,
    pub excluded_category_rows: usize,
    pub checklists_loaded: usize,
    pub checklists_with_sentinel: usize,
    pub removed_no_species: usize,
    pub removed_locality: usize,
    pub removed_incomplete: usize,
    pub removed_protocol: usize,
    pub removed_sentinel: usize,
    pub removed_year: usize,
    pub groups: GroupSummary,
    pub removed_invalid_effort: usize,
    pub removed_duration: usize,
    pub removed_distance: usize,
    pub rare_trim: Option<RareTrimSummary>,
    pub final_checklists: usize,
    pub final_species: usize,
}

impl CleaningReport {
    /// Print the per-step summary
    pub fn print_summary(&self) {
        println!("Filter summary:");
        println!(
            "  Rows: {} loaded, {} malformed, {} outside species/issf",
            self.input_rows, self.malformed_rows, self.excluded_category_rows
        );
        println!("  Checklists loaded: {}", self.checklists_loaded);
        let steps = [
            ("no retained species", self.removed_no_species),
            ("other localities", self.removed_locality),
            ("incomplete", self.removed_incomplete),
            ("protocol not allowed", self.removed_protocol),
            ("\"X\" counts", self.removed_sentinel),
            ("outside year window", self.removed_year),
            ("shared-checklist duplicates", self.groups.removed_duplicates),
            ("non-numeric effort", self.removed_invalid_effort),
            ("duration out of bounds", self.removed_duration),
            ("distance over cap", self.removed_distance),
        ];
        for (label, removed) in steps {
            if removed > 0 {
                println!("    - {}: removed {}", label, removed);
            }
        }
        if let Some(trim) = &self.rare_trim {
            println!(
                "    - rare species trim: {} species×locality pairs, {} emptied checklists",
                trim.removed_species, trim.removed_checklists
            );
        }
        println!(
            "  Final: {} checklists × {} species",
            self.final_checklists, self.final_species
        );
    }
}

/// Cleaned checklists with per-species summed counts
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub checklists: BTreeMap<String, Checklist>,
    /// checklist id → species → summed count
    pub counts: BTreeMap<String, BTreeMap<String, f64>>,
    pub report: CleaningReport,
}

impl CleanedDataset {
    /// Checklist × species matrix with explicit zero fill
    pub fn to_matrix(&self) -> CommunityMatrix {
        let localities: HashMap<String, String> = self
            .checklists
            .iter()
            .map(|(id, c)| (id.clone(), c.locality_id.clone()))
            .collect();
        CommunityMatrix::from_counts(&self.counts, &localities)
    }
}

/// Run every cleaning step on the raw observation table.
///
/// The group-deduplication draw consumes `rng`; pass a freshly seeded generator
/// per call to get the same representatives for both variants.
pub fn clean<R: Rng + ?Sized>(
    raw: &[RawObservation],
    config: &CleaningConfig,
    variant: Variant,
    rng: &mut R,
) -> Result<CleanedDataset> {
    println!("\n=== CLEANING CHECKLISTS ({} species) ===", variant.label());

    let mut report = CleaningReport {
        variant: Some(variant),
        input_rows: raw.len(),
        ..Default::default()
    };

    if let Some(locality) = &config.locality {
        if !raw.iter().any(|row| row.locality_id == *locality) {
            return Err(AnalysisError::UnknownLocality(locality.clone()));
        }
    }

    // Dates, sentinels, category folding and per-species sums
    let mut checklists: BTreeMap<String, Checklist> = BTreeMap::new();
    let mut sentinels: HashMap<String, usize> = HashMap::new();
    let mut invalid_effort: HashSet<String> = HashSet::new();
    let mut counts: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

    for row in raw {
        let date = match parse_date(&row.observation_date) {
            Some(date) => date,
            None => {
                note_malformed(&mut report, row, "unparseable date", &row.observation_date);
                continue;
            }
        };
        checklists
            .entry(row.checklist_id.clone())
            .or_insert_with(|| Checklist::from_row(row, date));

        if let Some(effort) = &row.invalid_effort {
            note_malformed(&mut report, row, "non-numeric effort", effort);
            invalid_effort.insert(row.checklist_id.clone());
        }

        let parsed = ObservationCount::parse(&row.count);
        if parsed == Some(ObservationCount::Present) {
            *sentinels.entry(row.checklist_id.clone()).or_default() += 1;
        }

        if !Category::parse(&row.category).is_retained() {
            report.excluded_category_rows += 1;
            continue;
        }

        match parsed {
            Some(ObservationCount::Count(value)) if value > 0.0 => {
                *counts
                    .entry(row.checklist_id.clone())
                    .or_default()
                    .entry(row.common_name.trim().to_string())
                    .or_default() += value;
            }
            // Zero counts record absence
            Some(ObservationCount::Count(_)) | Some(ObservationCount::Present) => {}
            None => note_malformed(&mut report, row, "non-numeric count", &row.count),
        }
    }

    report.checklists_loaded = checklists.len();
    report.checklists_with_sentinel = sentinels.len();
    if report.malformed_rows > 0 {
        eprintln!(
            "⚠️  Excluded {} malformed rows (e.g. {})",
            report.malformed_rows,
            report.malformed_examples.join("; ")
        );
    }

    // Checklists made only of sentinel, malformed or non-species rows
    report.removed_no_species = retain_counted(&mut checklists, |c| {
        counts.contains_key(&c.id) || sentinels.contains_key(&c.id)
    });

    if let Some(locality) = &config.locality {
        report.removed_locality = retain_counted(&mut checklists, |c| c.locality_id == *locality);
    }
    report.removed_incomplete = retain_counted(&mut checklists, |c| c.complete);
    report.removed_protocol =
        retain_counted(&mut checklists, |c| config.protocol_allowed(&c.protocol_type));
    report.removed_sentinel = retain_counted(&mut checklists, |c| !sentinels.contains_key(&c.id));
    report.removed_year = retain_counted(&mut checklists, |c| config.year_allowed(c.year));
    ensure_nonempty(&checklists, "quality filters")?;

    report.groups = deduplicate_groups(&mut checklists, config.group_pattern.as_ref(), rng);
    if report.groups.unmatched_ids > 0 {
        eprintln!(
            "⚠️  {} checklists carry group ids not matching the group pattern; kept as ungrouped",
            report.groups.unmatched_ids
        );
    }

    report.removed_invalid_effort =
        retain_counted(&mut checklists, |c| !invalid_effort.contains(&c.id));
    report.removed_duration =
        retain_counted(&mut checklists, |c| config.duration_allowed(c.duration_minutes));
    report.removed_distance =
        retain_counted(&mut checklists, |c| config.distance_allowed(c.effort_distance_km));
    ensure_nonempty(&checklists, "effort filters")?;

    let kept: HashSet<&String> = checklists.keys().collect();
    counts.retain(|id, _| kept.contains(id));

    if variant.trims_rare_species() {
        let trim = trim_rare_species(&mut counts, &checklists, config.trim_pct);
        checklists.retain(|id, _| counts.contains_key(id));
        report.rare_trim = Some(trim);
        ensure_nonempty(&checklists, "rare species trim")?;
    }

    report.final_checklists = counts.len();
    report.final_species = counts
        .values()
        .flat_map(|row| row.keys())
        .collect::<HashSet<_>>()
        .len();
    report.print_summary();

    Ok(CleanedDataset {
        checklists,
        counts,
        report,
    })
}

fn note_malformed(report: &mut CleaningReport, row: &RawObservation, reason: &str, value: &str) {
    report.malformed_rows += 1;
    if report.malformed_examples.len() < MALFORMED_EXAMPLES {
        report.malformed_examples.push(format!(
            "line {}: {} ({} '{}')",
            row.line, row.checklist_id, reason, value
        ));
    }
}

fn retain_counted<F>(checklists: &mut BTreeMap<String, Checklist>, mut keep: F) -> usize
where
    F: FnMut(&Checklist) -> bool,
{
    let before = checklists.len();
    checklists.retain(|_, c| keep(c));
    before - checklists.len()
}

fn ensure_nonempty(checklists: &BTreeMap<String, Checklist>, stage: &str) -> Result<()> {
    if checklists.is_empty() {
        Err(AnalysisError::EmptyAfterFiltering {
            stage: stage.to_string(),
        })
    } else {
        Ok(())
    }
}
