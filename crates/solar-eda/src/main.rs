//! CLI entry point for solar station exploratory analysis.

use anyhow::{Result, anyhow};
use clap::Parser;
use solar_eda::{
    AnalysisConfig, CorrelationOutcome, DataCleaner, DatasetLoader, ReportGenerator,
    StationReport,
};
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of solar irradiance station data",
    long_about = "Loads solar station CSV logs, checks data quality, cleans rows with \
                  missing sensor readings and summarises the result.\n\n\
                  EXAMPLES:\n  \
                  # Analyse every configured station\n  \
                  solar-eda --data-dir data\n\n  \
                  # One station, report written to disk\n  \
                  solar-eda -s Benin --emit-report -o reports/\n\n  \
                  # Machine-readable output\n  \
                  solar-eda -s Togo --json | jq .quality"
)]
struct Args {
    /// Station to analyse; all configured stations when omitted
    #[arg(short, long)]
    station: Option<String>,

    /// Directory holding the station CSV files (overrides the config file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON file with an analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for reports and cleaned files
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// List configured stations and exit
    #[arg(long)]
    list_stations: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the summary)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logs; only the report is written to stdout.
    /// Useful for piping to other tools: `... --json | jq .quality`
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <station>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the cleaned table to the output directory as <station>_clean.csv
    #[arg(long)]
    save_cleaned: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AnalysisConfig::from_json_file(path)?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = load_config(&args)?;

    if args.list_stations {
        for station in &config.stations {
            println!("{:<16} {}", station.id, config.station_path(station).display());
        }
        return Ok(());
    }

    let station_ids: Vec<String> = match &args.station {
        Some(id) => {
            if config.station(id).is_none() {
                let known: Vec<&str> = config.stations.iter().map(|s| s.id.as_str()).collect();
                return Err(anyhow!(
                    "Unknown station '{}'. Configured stations: {}",
                    id,
                    known.join(", ")
                ));
            }
            vec![id.clone()]
        }
        None => config.stations.iter().map(|s| s.id.clone()).collect(),
    };

    let loader = DatasetLoader::new(&config);
    let generator = ReportGenerator::new(&args.output);
    let mut reports = Vec::with_capacity(station_ids.len());

    for station in &station_ids {
        info!("Loading station: {}", station);
        let df = loader.load(station)?;
        info!("Station {} loaded: {:?}", station, df.shape());

        let report = ReportGenerator::build_station_report(station, &df, &config)?;

        if args.emit_report {
            generator.write_report_to_file(&report, station)?;
        }

        if args.save_cleaned {
            match DataCleaner::drop_incomplete(&df, &config) {
                Ok(cleaned) => {
                    generator.write_cleaned_csv(&cleaned, &station.to_lowercase())?;
                }
                Err(e) => warn!("Not saving cleaned table for {}: {}", station, e),
            }
        }

        reports.push(report);
    }

    if args.json {
        let json = match reports.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            all => serde_json::to_string_pretty(all)?,
        };
        println!("{}", json);
    } else {
        for report in &reports {
            print_summary(report);
        }
    }

    debug!("Processed {} station(s)", reports.len());
    Ok(())
}

/// Print a human-readable summary of one station report.
///
/// Uses `println!` rather than logging so the summary shows regardless of
/// log level.
fn print_summary(report: &StationReport) {
    println!("\n{}", "=".repeat(72));
    println!("STATION: {}", report.station);
    println!("{}", "=".repeat(72));
    println!("  Rows: {}", report.rows);
    println!("  Columns: {}", report.columns);
    if !report.missing_columns.is_empty() {
        println!("  Missing expected columns: {}", report.missing_columns.join(", "));
    }
    println!();

    println!("SUMMARY STATISTICS");
    println!("{}", "-".repeat(40));
    println!(
        "{:<14} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "Column", "Count", "Missing", "Mean", "Std", "Min", "Max"
    );
    for col in &report.summary {
        println!(
            "{:<14} {:>8} {:>8} {:>10} {:>10} {:>10} {:>10}",
            truncate_str(&col.name, 13),
            col.count,
            col.missing,
            fmt_opt(col.mean),
            fmt_opt(col.std),
            fmt_opt(col.min),
            fmt_opt(col.max)
        );
    }
    println!();

    println!("DATA QUALITY");
    println!("{}", "-".repeat(40));
    println!("  Missing values: {}", report.quality.total_missing());
    for (column, count) in report.quality.invalid_values.iter().filter(|(_, c)| **c > 0) {
        println!("  Negative values in {}: {}", column, count);
    }
    for (column, count) in report.quality.iqr_outlier_counts.iter().filter(|(_, c)| **c > 0) {
        println!("  IQR outliers in {}: {}", column, count);
    }
    for (column, count) in report.quality.zscore_outlier_counts.iter().filter(|(_, c)| **c > 0) {
        println!("  Z-score outliers in {}: {}", column, count);
    }
    if !report.quality.zero_variance_columns.is_empty() {
        println!(
            "  Constant columns (no Z-score): {}",
            report.quality.zero_variance_columns.join(", ")
        );
    }
    if !report.quality.has_issues() {
        println!("  No data quality issues detected");
    }
    println!();

    println!("CLEANING");
    println!("{}", "-".repeat(40));
    match &report.cleaning {
        Some(cleaning) => println!(
            "  Dropped {} of {} rows with missing critical values",
            cleaning.rows_removed, cleaning.rows_before
        ),
        None => println!("  Skipped: no critical columns present"),
    }
    println!();

    println!("CORRELATION");
    println!("{}", "-".repeat(40));
    match &report.correlation {
        CorrelationOutcome::Computed(matrix) => {
            for (a, b, r) in matrix.strongest_pairs().into_iter().take(5) {
                println!("  {:<8} ~ {:<8} r = {:+.3}", a, b, r);
            }
        }
        CorrelationOutcome::Skipped { reason, .. } => println!("  Skipped: {}", reason),
    }
    println!();

    if let Some(rose) = &report.wind_rose {
        println!("WIND");
        println!("{}", "-".repeat(40));
        println!("  Samples: {}", rose.samples);
        if let Some(sector) = rose.prevailing_sector() {
            println!(
                "  Prevailing direction: {:.1} deg ({:.1}% of samples, mean {} m/s)",
                sector.center_degrees,
                sector.frequency * 100.0,
                fmt_opt(sector.mean_speed)
            );
        }
        println!();
    }

    if let Some(impact) = &report.cleaning_impact {
        println!("CLEANING IMPACT");
        println!("{}", "-".repeat(40));
        println!(
            "  Cleaned rows: {}, not cleaned: {}",
            impact.cleaned_rows, impact.not_cleaned_rows
        );
        for module in &impact.modules {
            println!(
                "  {:<6} cleaned {:>10}  not cleaned {:>10}",
                module.column,
                fmt_opt(module.mean_cleaned),
                fmt_opt(module.mean_not_cleaned)
            );
        }
        println!();
    }

    if let Some(series) = &report.time_series {
        println!("DAILY TIME SERIES");
        println!("{}", "-".repeat(40));
        for bucket in &series.buckets {
            let means: Vec<String> = bucket
                .values
                .iter()
                .map(|(column, agg)| format!("{} {}", column, fmt_opt(agg.mean)))
                .collect();
            println!(
                "  {}  rows {:>6}  {}",
                bucket.start.format("%Y-%m-%d"),
                bucket.rows,
                means.join("  ")
            );
        }
        println!();
    }

    if let Some(bubble) = &report.bubble {
        println!("BUBBLE CHART (GHI vs Tamb, RH size, WS colour)");
        println!("{}", "-".repeat(40));
        println!(
            "  Points: {} of {} complete rows",
            bubble.points.len(),
            bubble.complete_rows
        );
        println!();
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
