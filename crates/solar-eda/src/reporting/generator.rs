use crate::analysis::{
    BubbleChart, CleaningImpact, CorrelationOutcome, Resolution, TimeSeries, WindRose,
    bubble_chart, cleaning_impact, correlation_analysis, time_series, wind_rose,
};
use crate::cleaner::{CleaningSummary, DataCleaner};
use crate::config::AnalysisConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::profiler::DataProfiler;
use crate::quality::DataQualityAnalyzer;
use crate::schema::{AnalysisScope, missing_columns, present_columns};
use crate::types::{ColumnSummary, QualityReport};
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Upper bound on bubble-chart points carried in a report.
pub const REPORT_BUBBLE_POINTS: usize = 500;

// ============================================================================
// Station Report
// ============================================================================

/// Everything the dashboard shows for one station, in one serialisable value.
///
/// Profiling and quality checks describe the raw table. Correlation, wind,
/// cleaning-impact, time-series and bubble views are computed on the cleaned
/// table whenever cleaning was possible.
///
/// Used for both `--json` output and `--emit-report` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub station: String,
    pub rows: usize,
    pub columns: usize,
    /// Expected sensor columns found in the table
    pub present_columns: Vec<String>,
    /// Expected sensor columns the table lacks
    pub missing_columns: Vec<String>,
    pub scope: AnalysisScope,
    pub summary: Vec<ColumnSummary>,
    pub quality: QualityReport,
    /// `None` when the table has no critical column to clean on
    pub cleaning: Option<CleaningSummary>,
    pub correlation: CorrelationOutcome,
    pub wind_rose: Option<WindRose>,
    pub cleaning_impact: Option<CleaningImpact>,
    /// Daily irradiance and temperature
    pub time_series: Option<TimeSeries>,
    pub bubble: Option<BubbleChart>,
}

impl StationReport {
    /// Rows surviving the cleaning pass, or all rows if cleaning was skipped.
    pub fn rows_after_cleaning(&self) -> usize {
        self.cleaning
            .as_ref()
            .map(|c| c.rows_after)
            .unwrap_or(self.rows)
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds station reports and writes them as JSON files.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Run every analysis on a loaded station table.
    pub fn build_station_report(
        station: &str,
        df: &DataFrame,
        config: &AnalysisConfig,
    ) -> Result<StationReport> {
        debug!("Building report for station {}", station);

        let summary = DataProfiler::summary_statistics(df)
            .context(format!("summary statistics for {}", station))?;
        let quality = DataQualityAnalyzer::analyze(df, config)
            .context(format!("quality checks for {}", station))?;

        let (cleaned, cleaning) = match DataCleaner::drop_incomplete_with_summary(df, config) {
            Ok((cleaned, summary)) => (cleaned, Some(summary)),
            Err(EdaError::Schema(reason)) => {
                warn!("Cleaning skipped for {}: {}", station, reason);
                (df.clone(), None)
            }
            Err(e) => return Err(e),
        };

        let correlation = correlation_analysis(&cleaned, &config.expected_columns)?;
        let wind_rose = wind_rose(&cleaned, config.wind_sectors)?;
        let cleaning_impact = cleaning_impact(&cleaned)?;
        let time_series = time_series(&cleaned, Resolution::Daily)?;
        let bubble = bubble_chart(&cleaned, REPORT_BUBBLE_POINTS)?;

        Ok(StationReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            station: station.to_string(),
            rows: df.height(),
            columns: df.width(),
            present_columns: present_columns(df, &config.expected_columns),
            missing_columns: missing_columns(df, &config.expected_columns),
            scope: AnalysisScope::assess(df, &config.expected_columns),
            summary,
            quality,
            cleaning,
            correlation,
            wind_rose,
            cleaning_impact,
            time_series,
            bubble,
        })
    }

    /// Write a report to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file(&self, report: &StationReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write a cleaned station table to `<output_dir>/<base_name>_clean.csv`.
    pub fn write_cleaned_csv(&self, df: &DataFrame, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.output_dir.join(format!("{}_clean.csv", base_name));
        let mut file = File::create(&output_path)?;
        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        info!("Cleaned dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}
