// config.rs - Configuration file support

use crate::data::loaders::ColumnOverrides;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub observations: Option<String>,
    pub output_prefix: Option<String>,
    pub format: Option<String>,
    pub column_style: Option<String>,
    pub delimiter: Option<String>,

    // Cleaning
    pub locality: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub protocols: Option<Vec<String>>,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub max_distance: Option<f64>,
    pub trim_pct: Option<f64>,
    pub no_trim_variant: Option<bool>,
    pub group_pattern: Option<String>,

    // Metric engines
    pub accum_permutations: Option<usize>,
    pub similarity_permutations: Option<usize>,
    pub bootstrap_reps: Option<usize>,
    pub estimator: Option<String>,
    pub dissimilarity: Option<String>,
    pub diversity_index: Option<String>,
    pub disjoint_groups: Option<bool>,
    pub thresholds: Option<Vec<f64>>,
    pub seed: Option<u64>,

    // Performance
    pub threads: Option<usize>,

    // Flags
    pub dry_run: Option<bool>,

    /// Header overrides, `[columns]` table
    pub columns: Option<ColumnOverrides>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# birdeffort.toml - Configuration file for birdeffort
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Observation table exported from eBird (.csv or tab-delimited .txt/.tsv)
observations = "/path/to/ebd_observations.txt"

# Prefix for <prefix>_<variant>_<table>.<format> and <prefix>_summary.json
output_prefix = "results/park"

# Output format: tsv, csv
format = "tsv"

# Header naming style: underscore (sampling_event_identifier) or dotted (SAMPLING.EVENT.IDENTIFIER)
column_style = "underscore"

# Input delimiter: tab, comma (omit to pick from the file extension)
# delimiter = "tab"

# =============================================================================
# CLEANING
# =============================================================================

# Locality identifier to analyse
locality = "L123456"

# Inclusive year window
year_min = 2015
year_max = 2019

# Allowed protocol types, matched whole and ignoring case.
# Older eBird exports use the long names instead:
# protocols = ["eBird - Traveling Count", "eBird - Stationary Count", "eBird - Exhaustive Area Count"]
protocols = ["Traveling", "Stationary", "Area"]

# Checklist duration bounds in minutes (inclusive)
min_duration = 5.0
max_duration = 240.0

# Maximum effort distance in km (checklists without a distance pass,
# non-numeric distances such as "25 km" are dropped)
max_distance = 10.0

# Species on fewer than this percentage of a locality's checklists are trimmed
trim_pct = 5.0

# Skip the rare-species-trimmed variant
no_trim_variant = false

# Group identifiers must match this regex to be deduplicated
# group_pattern = "^G\\d+$"

# =============================================================================
# METRIC ENGINES
# =============================================================================

accum_permutations = 1000
similarity_permutations = 1000
bootstrap_reps = 1000

# Species pool estimator: chao, jack1, jack2, bootstrap
estimator = "chao"

# Dissimilarity index: bray, jaccard
dissimilarity = "bray"

# Diversity index: shannon, simpson, invsimpson
diversity_index = "shannon"

# Draw non-overlapping similarity groups (sample sizes up to N/2)
disjoint_groups = false

# Cumulative-percentage thresholds
thresholds = [70.0, 80.0, 90.0]

# Random seed
seed = 42

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 8

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs and report cleaning without running the metric engines
dry_run = false

# =============================================================================
# COLUMN OVERRIDES
# =============================================================================

# Header names for individual columns, applied on top of column_style
# [columns]
# checklist_id = "SAMPLING EVENT IDENTIFIER"
# count = "OBSERVATION COUNT"
"#
        .to_string()
    }
}
