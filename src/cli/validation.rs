// validation.rs - Input validation utilities

use crate::cleaning::CleaningConfig;
use crate::cli::args::Args;
use crate::core::RichnessEstimator;
use crate::data::loaders::{ColumnMap, ColumnOverrides, ColumnStyle};
use crate::indices::IndexRegistry;
use crate::output::OutputFormat;
use crate::pipeline::AnalysisSettings;
use regex::Regex;
use std::str::FromStr;

pub struct ValidationResult {
    pub settings: AnalysisSettings,
    pub column_map: ColumnMap,
    /// None: choose from the file extension
    pub delimiter: Option<u8>,
    pub format: OutputFormat,
}

/// Validate all command line arguments
pub fn validate_args(
    args: &Args,
    columns: Option<&ColumnOverrides>,
) -> Result<ValidationResult, String> {
    let format = OutputFormat::from_str(&args.format)?;
    let style = ColumnStyle::from_str(&args.column_style)?;
    let column_map = match columns {
        Some(overrides) => ColumnMap::for_style(style).with_overrides(overrides),
        None => ColumnMap::for_style(style),
    };
    let delimiter = args.delimiter.as_deref().map(parse_delimiter).transpose()?;

    // Validate year window
    if let (Some(min), Some(max)) = (args.year_min, args.year_max) {
        if min > max {
            return Err(format!("--year-min ({}) is after --year-max ({})", min, max));
        }
    }

    // Validate effort bounds
    if args.min_duration < 0.0 || args.max_distance < 0.0 {
        return Err("Duration and distance bounds must not be negative".to_string());
    }
    if args.min_duration > args.max_duration {
        return Err(format!(
            "--min-duration ({}) exceeds --max-duration ({})",
            args.min_duration, args.max_duration
        ));
    }
    check_percentage("--trim-pct", args.trim_pct)?;

    let protocols: Vec<String> = args
        .protocols
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if protocols.is_empty() {
        return Err("--protocols must name at least one protocol type".to_string());
    }

    // Validate permutation counts
    for (flag, value) in [
        ("--accum-permutations", args.accum_permutations),
        ("--similarity-permutations", args.similarity_permutations),
        ("--bootstrap-reps", args.bootstrap_reps),
    ] {
        if value == 0 {
            return Err(format!("{} must be at least 1", flag));
        }
    }

    let thresholds = parse_thresholds(&args.thresholds)?;
    let estimator = RichnessEstimator::from_str(&args.estimator)?;

    // Validate index names
    let registry = IndexRegistry::new();
    let dissimilarity = registry
        .dissimilarity(&args.dissimilarity)
        .map_err(|e| e.to_string())?
        .name()
        .to_string();
    let diversity_index = registry
        .diversity(&args.diversity_index)
        .map_err(|e| e.to_string())?
        .name()
        .to_string();

    // Compile regex patterns
    let group_pattern = if let Some(pattern) = &args.group_pattern {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid group_pattern regex: {}", e))?)
    } else {
        None
    };

    let cleaning = CleaningConfig {
        locality: args.locality.clone(),
        year_min: args.year_min,
        year_max: args.year_max,
        protocols,
        min_duration: args.min_duration,
        max_duration: args.max_duration,
        max_distance_km: args.max_distance,
        trim_pct: args.trim_pct,
        group_pattern,
    };

    Ok(ValidationResult {
        settings: AnalysisSettings {
            cleaning,
            accumulation_permutations: args.accum_permutations,
            similarity_permutations: args.similarity_permutations,
            bootstrap_repetitions: args.bootstrap_reps,
            estimator,
            dissimilarity,
            diversity_index,
            disjoint_groups: args.disjoint_groups,
            thresholds,
            seed: args.seed,
            frequent_variant: !args.no_trim_variant,
        },
        column_map,
        delimiter,
        format,
    })
}

fn check_percentage(flag: &str, value: f64) -> Result<(), String> {
    if value > 0.0 && value <= 100.0 {
        Ok(())
    } else {
        Err(format!("{} must be in (0, 100], got {}", flag, value))
    }
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value.to_lowercase().as_str() {
        "tab" | "\\t" | "\t" | "tsv" => Ok(b'\t'),
        "comma" | "," | "csv" => Ok(b','),
        _ => Err(format!("Invalid delimiter '{}'. Use: tab, comma", value)),
    }
}

/// Comma-separated percentages, sorted ascending
fn parse_thresholds(list: &str) -> Result<Vec<f64>, String> {
    let mut thresholds = list
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            let value = t
                .trim_end_matches('%')
                .parse::<f64>()
                .map_err(|_| format!("Invalid threshold '{}'", t))?;
            check_percentage("--thresholds", value)?;
            Ok(value)
        })
        .collect::<Result<Vec<f64>, String>>()?;
    if thresholds.is_empty() {
        return Err("--thresholds must list at least one percentage".to_string());
    }
    thresholds.sort_by(|a, b| a.total_cmp(b));
    thresholds.dedup();
    Ok(thresholds)
}
