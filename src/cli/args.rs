// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// birdeffort - Sampling-effort sufficiency for eBird checklists at a locality
pub struct Args {
    /// path to the observation table (.csv or .tsv/.txt)
    #[argh(option)]
    pub observations: Option<String>,

    /// prefix for output tables and the JSON summary
    #[argh(option)]
    pub output_prefix: Option<String>,

    /// output format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub format: String,

    /// header naming style: underscore, dotted (default: underscore)
    #[argh(option, default = "String::from(\"underscore\")")]
    pub column_style: String,

    /// input delimiter: tab, comma (default: from file extension)
    #[argh(option)]
    pub delimiter: Option<String>,

    /// locality identifier to analyse
    #[argh(option)]
    pub locality: Option<String>,

    /// first observation year to keep (inclusive)
    #[argh(option)]
    pub year_min: Option<i32>,

    /// last observation year to keep (inclusive)
    #[argh(option)]
    pub year_max: Option<i32>,

    /// allowed protocol types, comma separated, matched whole and ignoring case; older exports
    /// spell them "eBird - Traveling Count", "eBird - Stationary Count" and
    /// "eBird - Exhaustive Area Count" (default: Traveling,Stationary,Area)
    #[argh(option, default = "String::from(\"Traveling,Stationary,Area\")")]
    pub protocols: String,

    /// minimum checklist duration in minutes (default: 5)
    #[argh(option, default = "5.0")]
    pub min_duration: f64,

    /// maximum checklist duration in minutes (default: 240)
    #[argh(option, default = "240.0")]
    pub max_duration: f64,

    /// maximum effort distance in km (default: 10)
    #[argh(option, default = "10.0")]
    pub max_distance: f64,

    /// percentage of a locality's checklists a species must appear on to survive the rare-species trim (default: 5)
    #[argh(option, default = "5.0")]
    pub trim_pct: f64,

    /// skip the rare-species-trimmed variant
    #[argh(switch)]
    pub no_trim_variant: bool,

    /// regex a group identifier must match to be treated as a shared checklist
    #[argh(option)]
    pub group_pattern: Option<String>,

    /// permutations for the species accumulation curve (default: 1000)
    #[argh(option, default = "1000")]
    pub accum_permutations: usize,

    /// permutations per sample size for similarity decay (default: 1000)
    #[argh(option, default = "1000")]
    pub similarity_permutations: usize,

    /// bootstrap repetitions for the diversity sweep (default: 1000)
    #[argh(option, default = "1000")]
    pub bootstrap_reps: usize,

    /// species pool estimator: chao, jack1, jack2, bootstrap (default: chao)
    #[argh(option, default = "String::from(\"chao\")")]
    pub estimator: String,

    /// dissimilarity index: bray, jaccard (default: bray)
    #[argh(option, default = "String::from(\"bray\")")]
    pub dissimilarity: String,

    /// diversity index: shannon, simpson, invsimpson (default: shannon)
    #[argh(option, default = "String::from(\"shannon\")")]
    pub diversity_index: String,

    /// draw the two similarity groups without overlap (sample sizes up to N/2)
    #[argh(switch)]
    pub disjoint_groups: bool,

    /// cumulative-percentage thresholds, comma separated (default: 70,80,90)
    #[argh(option, default = "String::from(\"70,80,90\")")]
    pub thresholds: String,

    /// random seed (default: 42)
    #[argh(option, default = "42")]
    pub seed: u64,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,

    /// validate inputs and report cleaning without running the metric engines
    #[argh(switch)]
    pub dry_run: bool,

    /// show dataset statistics and species pool estimates only, then exit
    #[argh(switch)]
    pub stats_only: bool,
}
