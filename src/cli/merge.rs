// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::data::loaders::ColumnOverrides;

fn join_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.observations.is_none() {
            self.observations = config.observations;
        }
        if self.output_prefix.is_none() {
            self.output_prefix = config.output_prefix;
        }
        if self.delimiter.is_none() {
            self.delimiter = config.delimiter;
        }

        // Choices (only override defaults, not explicit CLI values)
        if let Some(format) = config.format.filter(|_| self.format == "tsv") {
            self.format = format;
        }
        if let Some(style) = config.column_style.filter(|_| self.column_style == "underscore") {
            self.column_style = style;
        }
        if let Some(estimator) = config.estimator.filter(|_| self.estimator == "chao") {
            self.estimator = estimator;
        }
        if let Some(index) = config.dissimilarity.filter(|_| self.dissimilarity == "bray") {
            self.dissimilarity = index;
        }
        if let Some(index) = config
            .diversity_index
            .filter(|_| self.diversity_index == "shannon")
        {
            self.diversity_index = index;
        }

        // Cleaning
        if self.locality.is_none() {
            self.locality = config.locality;
        }
        if self.year_min.is_none() {
            self.year_min = config.year_min;
        }
        if self.year_max.is_none() {
            self.year_max = config.year_max;
        }
        if let Some(protocols) = config
            .protocols
            .filter(|_| self.protocols == "Traveling,Stationary,Area")
        {
            self.protocols = join_list(&protocols);
        }
        if let Some(v) = config.min_duration.filter(|_| self.min_duration == 5.0) {
            self.min_duration = v;
        }
        if let Some(v) = config.max_duration.filter(|_| self.max_duration == 240.0) {
            self.max_duration = v;
        }
        if let Some(v) = config.max_distance.filter(|_| self.max_distance == 10.0) {
            self.max_distance = v;
        }
        if let Some(v) = config.trim_pct.filter(|_| self.trim_pct == 5.0) {
            self.trim_pct = v;
        }
        if self.group_pattern.is_none() {
            self.group_pattern = config.group_pattern;
        }

        // Metric engines
        if let Some(v) = config
            .accum_permutations
            .filter(|_| self.accum_permutations == 1000)
        {
            self.accum_permutations = v;
        }
        if let Some(v) = config
            .similarity_permutations
            .filter(|_| self.similarity_permutations == 1000)
        {
            self.similarity_permutations = v;
        }
        if let Some(v) = config.bootstrap_reps.filter(|_| self.bootstrap_reps == 1000) {
            self.bootstrap_reps = v;
        }
        if let Some(thresholds) = config.thresholds.filter(|_| self.thresholds == "70,80,90") {
            self.thresholds = join_list(&thresholds);
        }
        if let Some(v) = config.seed.filter(|_| self.seed == 42) {
            self.seed = v;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.no_trim_variant && config.no_trim_variant.unwrap_or(false) {
            self.no_trim_variant = true;
        }
        if !self.disjoint_groups && config.disjoint_groups.unwrap_or(false) {
            self.disjoint_groups = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args; also returns the `[columns]` overrides
    pub fn with_config_file(
        self,
        config_path: &str,
    ) -> Result<(Self, Option<ColumnOverrides>), String> {
        let mut config = Config::from_file(config_path)?;
        let columns = config.columns.take();
        Ok((self.merge_with_config(config), columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["birdeffort"], args).unwrap()
    }

    #[test]
    fn test_config_fills_unset_values() {
        let config = Config {
            observations: Some("obs.txt".to_string()),
            locality: Some("L1".to_string()),
            protocols: Some(vec!["Stationary".to_string()]),
            thresholds: Some(vec![75.0, 95.0]),
            bootstrap_reps: Some(200),
            disjoint_groups: Some(true),
            ..Config::new()
        };
        let args = parse(&[]).merge_with_config(config);

        assert_eq!(args.observations.as_deref(), Some("obs.txt"));
        assert_eq!(args.locality.as_deref(), Some("L1"));
        assert_eq!(args.protocols, "Stationary");
        assert_eq!(args.thresholds, "75,95");
        assert_eq!(args.bootstrap_reps, 200);
        assert!(args.disjoint_groups);
    }

    #[test]
    fn test_cli_values_take_precedence() {
        let config = Config {
            locality: Some("L1".to_string()),
            estimator: Some("jack2".to_string()),
            seed: Some(99),
            max_duration: Some(120.0),
            ..Config::new()
        };
        let args = parse(&[
            "--locality",
            "L7",
            "--estimator",
            "jack1",
            "--seed",
            "5",
            "--max-duration",
            "180",
        ])
        .merge_with_config(config);

        assert_eq!(args.locality.as_deref(), Some("L7"));
        assert_eq!(args.estimator, "jack1");
        assert_eq!(args.seed, 5);
        assert_eq!(args.max_duration, 180.0);
    }

    #[test]
    fn test_with_config_file_returns_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            "seed = 3\n\n[columns]\nlocality_id = \"LOC\"\n",
        )
        .unwrap();

        let (args, columns) = parse(&[])
            .with_config_file(path.to_str().unwrap())
            .unwrap();
        assert_eq!(args.seed, 3);
        assert_eq!(columns.unwrap().locality_id.as_deref(), Some("LOC"));
    }
}
