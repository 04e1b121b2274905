// mod.rs - Curve, threshold and summary writers

use crate::core::ThresholdOutcome;
use crate::pipeline::{VariantReport, VariantSummary};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Delimited table flavour for the curve files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tsv,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            OutputFormat::Tsv => b'\t',
            OutputFormat::Csv => b',',
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unsupported output format: {}. Use: tsv, csv", s)),
        }
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                format!(
                    "Failed to create parent directory '{}': {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }
    Ok(())
}

fn na(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), num)
}

fn num(value: f64) -> String {
    format!("{:.6}", value)
}

/// Create the file and write the `# Command` / `# Generated` / version header
fn open_with_header(file_path: &str, command_line: &str) -> Result<BufWriter<File>, String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# birdeffort v{}", env!("CARGO_PKG_VERSION"))
        .map_err(|e| format!("Write error: {}", e))?;
    Ok(writer)
}

/// Write a header row and data rows as a delimited table
fn write_table(
    file_path: &str,
    format: OutputFormat,
    header: &[&str],
    rows: Vec<Vec<String>>,
    command_line: &str,
) -> Result<(), String> {
    let writer = open_with_header(file_path, command_line)?;
    let mut table = WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);

    table
        .write_record(header)
        .map_err(|e| format!("Write error: {}", e))?;
    for row in rows {
        table
            .write_record(&row)
            .map_err(|e| format!("Write error: {}", e))?;
    }
    table.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

fn table_path(prefix: &str, variant: &str, table: &str, format: OutputFormat) -> String {
    format!("{}_{}_{}.{}", prefix, variant, table, format.extension())
}

/// Write the accumulation, similarity, diversity and threshold tables of one
/// variant. Returns the paths written.
pub fn write_variant_tables(
    prefix: &str,
    format: OutputFormat,
    report: &VariantReport,
    command_line: &str,
) -> Result<Vec<String>, String> {
    let variant = report.variant.label();
    let mut written = Vec::with_capacity(4);

    let path = table_path(prefix, variant, "accumulation", format);
    let rows = report
        .accumulation
        .points
        .iter()
        .map(|p| {
            vec![
                p.checklists.to_string(),
                num(p.mean_richness),
                num(p.sd),
                na(p.cumulative_pct),
            ]
        })
        .collect();
    write_table(
        &path,
        format,
        &["checklists", "mean_richness", "sd", "cumulative_pct"],
        rows,
        command_line,
    )?;
    written.push(path);

    let path = table_path(prefix, variant, "similarity", format);
    let rows = report
        .similarity
        .points
        .iter()
        .map(|p| {
            vec![
                p.checklists.to_string(),
                na(p.mean),
                na(p.sd),
                p.valid_permutations.to_string(),
                na(p.cumulative_pct),
            ]
        })
        .collect();
    write_table(
        &path,
        format,
        &[
            "checklists",
            "mean_similarity",
            "sd",
            "valid_permutations",
            "cumulative_pct",
        ],
        rows,
        command_line,
    )?;
    written.push(path);

    let path = table_path(prefix, variant, "diversity", format);
    let rows = report
        .diversity
        .points
        .iter()
        .map(|p| {
            vec![
                p.checklists.to_string(),
                num(p.mean),
                num(p.sd),
                na(p.cv),
                num(p.lower_2_5),
                num(p.upper_97_5),
                na(p.cumulative_pct),
            ]
        })
        .collect();
    write_table(
        &path,
        format,
        &[
            "checklists",
            "mean_diversity",
            "sd",
            "cv",
            "lower_2_5",
            "upper_97_5",
            "cumulative_pct",
        ],
        rows,
        command_line,
    )?;
    written.push(path);

    let path = table_path(prefix, variant, "thresholds", format);
    let rows = report
        .thresholds
        .iter()
        .flat_map(|metric| {
            metric.records.iter().map(move |record| {
                let (size, pct) = match record.outcome {
                    ThresholdOutcome::Reached {
                        sample_size,
                        cumulative_pct,
                    } => (sample_size.to_string(), num(cumulative_pct)),
                    ThresholdOutcome::NotReached => ("NA".to_string(), "NA".to_string()),
                };
                vec![metric.metric.to_string(), record.label(), size, pct]
            })
        })
        .collect();
    write_table(
        &path,
        format,
        &["metric", "threshold", "sample_size", "cumulative_pct"],
        rows,
        command_line,
    )?;
    written.push(path);

    for path in &written {
        println!("✅ Table written to: {}", path);
    }
    Ok(written)
}

#[derive(Serialize)]
struct RunSummary<'a, S: Serialize> {
    tool: String,
    command: &'a str,
    generated: String,
    settings: &'a S,
    variants: Vec<VariantSummary<'a>>,
}

/// Write `<prefix>_summary.json` with the run settings and every variant digest
pub fn write_summary_json<S: Serialize>(
    prefix: &str,
    settings: &S,
    reports: &[VariantReport],
    command_line: &str,
) -> Result<String, String> {
    let path = format!("{}_summary.json", prefix);
    ensure_parent_dir(&path)?;

    let summary = RunSummary {
        tool: format!("birdeffort v{}", env!("CARGO_PKG_VERSION")),
        command: command_line,
        generated: chrono::Utc::now().to_rfc3339(),
        settings,
        variants: reports.iter().map(VariantReport::summary).collect(),
    };

    let file =
        File::create(&path).map_err(|e| format!("Failed to create output file '{}': {}", path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &summary)
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    writeln!(writer).map_err(|e| format!("Write error: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;

    println!("✅ Summary written to: {}", path);
    Ok(path)
}
