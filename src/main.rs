// main.rs - CLI entry point

use birdeffort::cli::Config;
use birdeffort::core::SpeciesPool;
use birdeffort::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> std::result::Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    let mut column_overrides = None;
    if let Some(config_path) = args.config.clone() {
        let (merged, columns) = args.with_config_file(&config_path)?;
        args = merged;
        column_overrides = columns;
    }

    let observations = args
        .observations
        .clone()
        .ok_or("--observations is required")?;
    let output_prefix = if args.stats_only || args.dry_run {
        None
    } else {
        Some(
            args.output_prefix
                .clone()
                .ok_or("--output-prefix is required")?,
        )
    };

    let total_start = Instant::now();
    println!("🐦 {}", birdeffort::get_info());

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    let validation = validate_args(&args, column_overrides.as_ref())?;
    let settings = validation.settings;
    println!(
        "🎯 Indices: {} similarity, {} diversity, {} species pool",
        settings.dissimilarity,
        settings.diversity_index,
        settings.estimator.name()
    );
    println!("🎲 Seed: {}", settings.seed);

    let raw = load_observations(
        Path::new(&observations),
        &validation.column_map,
        validation.delimiter,
    )
    .map_err(|e| e.to_string())?;

    if args.dry_run {
        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let dataset = clean(&raw, &settings.cleaning, Variant::AllSpecies, &mut rng)
            .map_err(|e| e.to_string())?;
        println!(
            "\n✅ Dry run completed: {} checklists × {} species ready for analysis",
            dataset.report.final_checklists, dataset.report.final_species
        );
        return Ok(());
    }

    if args.stats_only {
        return print_stats(&raw, &settings);
    }

    let reports = run_analysis(&raw, &settings).map_err(|e| e.to_string())?;

    // Write output
    let prefix = output_prefix.ok_or("--output-prefix is required")?;
    let mut written = Vec::new();
    for report in &reports {
        written.extend(write_variant_tables(
            &prefix,
            validation.format,
            report,
            &command_line,
        )?);
    }
    written.push(write_summary_json(
        &prefix,
        &settings.digest(),
        &reports,
        &command_line,
    )?);

    for report in &reports {
        report.print_thresholds();
    }

    // Print summary
    let total_elapsed = total_start.elapsed();
    println!("\n🎉 === BIRDEFFORT COMPLETED SUCCESSFULLY ===");
    println!(
        "⏱️  Total execution time: {:.2}s",
        total_elapsed.as_secs_f64()
    );
    println!("📁 {} files written with prefix: {}", written.len(), prefix);
    println!("🔧 Command: {}", command_line);

    Ok(())
}

/// Clean the all-species variant and report dataset statistics and species pool
/// estimates without running the permutation engines
fn print_stats(raw: &[RawObservation], settings: &AnalysisSettings) -> std::result::Result<(), String> {
    let mut rng = SmallRng::seed_from_u64(settings.seed);
    let dataset = clean(raw, &settings.cleaning, Variant::AllSpecies, &mut rng)
        .map_err(|e| e.to_string())?;
    let matrix = dataset.to_matrix();

    println!("\n📈 === CHECKLIST STATISTICS ===");
    println!("🐦 Checklists: {}", matrix.n_checklists());
    println!("🐦 Species recorded: {}", matrix.richness());
    println!("📍 Localities: {}", matrix.locality_ids().len());

    let per_checklist: Vec<f64> = matrix
        .presence_lists()
        .iter()
        .map(|present| present.len() as f64)
        .collect();
    let totals = matrix.row_totals();
    if !per_checklist.is_empty() {
        let n = per_checklist.len() as f64;
        println!(
            "  • Mean species per checklist: {:.1}",
            per_checklist.iter().sum::<f64>() / n
        );
        println!(
            "  • Mean birds counted per checklist: {:.1}",
            totals.iter().sum::<f64>() / n
        );
    }

    match SpeciesPool::from_matrix(&matrix) {
        Ok(pool) => {
            println!("🧮 Species pool estimates:");
            println!(
                "  • Observed: {} ({} singletons, {} doubletons)",
                pool.observed, pool.singletons, pool.doubletons
            );
            for estimator in [
                RichnessEstimator::Chao,
                RichnessEstimator::Jack1,
                RichnessEstimator::Jack2,
                RichnessEstimator::Bootstrap,
            ] {
                println!("  • {:<9} {:.1}", estimator.name(), pool.estimate(estimator));
            }
        }
        Err(e) => println!("⚠️  Species pool not estimated: {}", e),
    }

    println!("🔌 Available indices:");
    for (kind, name, description) in IndexRegistry::new().list_indices() {
        println!("  - {} ({}): {}", name, kind, description);
    }

    println!("\n✅ Statistics analysis completed");
    Ok(())
}
