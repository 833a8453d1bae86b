//! Integration tests for station loading, quality checks and reports.
//!
//! These tests run the library end to end over the CSV fixtures.

use chrono::NaiveDate;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use solar_eda::{
    AnalysisConfig, BubblePoint, CorrelationOutcome, DataCleaner, DataQualityAnalyzer,
    DatasetLoader, EdaError, ReportGenerator, Resolution, StationConfig, time_series,
};
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Default station set, reading from the fixtures directory.
fn fixture_config() -> AnalysisConfig {
    AnalysisConfig::builder()
        .data_dir(fixtures_path())
        .build()
        .unwrap()
}

fn load(station: &str) -> DataFrame {
    DatasetLoader::new(&fixture_config()).load(station).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_station_coerces_timestamps() {
    let df = load("Benin");

    assert_eq!(df.shape(), (12, 19));
    assert!(matches!(
        df.column("Timestamp").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
    assert_eq!(df.column("Timestamp").unwrap().null_count(), 0);
}

#[test]
fn test_load_t_separated_timestamps() {
    let df = load("Togo");
    assert_eq!(df.height(), 4);
    assert!(matches!(
        df.column("Timestamp").unwrap().dtype(),
        DataType::Datetime(_, _)
    ));
}

#[test]
fn test_loader_caches_tables() {
    let loader = DatasetLoader::new(&fixture_config());
    assert!(!loader.is_cached("Benin"));

    let first = loader.load("Benin").unwrap();
    assert!(loader.is_cached("Benin"));
    assert!(!loader.is_cached("Togo"));

    let second = loader.load("Benin").unwrap();
    assert!(first.equals_missing(&second));
}

#[test]
fn test_unknown_station_is_configuration_error() {
    let loader = DatasetLoader::new(&fixture_config());
    let err = loader.load("Atlantis").unwrap_err();

    assert!(matches!(err, EdaError::Configuration(_)));
    assert!(!err.is_data_access());
}

#[test]
fn test_missing_station_file_is_data_access_error() {
    // Sierraleone is configured but has no fixture file
    let loader = DatasetLoader::new(&fixture_config());
    let err = loader.load("Sierraleone").unwrap_err();

    assert!(err.is_data_access());
    assert_eq!(err.error_code(), "DATA_ACCESS_ERROR");
    assert!(!loader.is_cached("Sierraleone"));
}

#[test]
fn test_bad_timestamp_is_data_access_error() {
    let config = AnalysisConfig::builder()
        .data_dir(fixtures_path())
        .stations(vec![StationConfig::new("Broken", "broken-timestamps.csv")])
        .build()
        .unwrap();

    let err = DatasetLoader::new(&config).load("Broken").unwrap_err();
    assert!(err.is_data_access());
}

#[test]
fn test_text_token_in_sensor_column_is_data_access_error() {
    let config = AnalysisConfig::builder()
        .data_dir(fixtures_path())
        .stations(vec![StationConfig::new("Faulty", "text-in-sensor.csv")])
        .build()
        .unwrap();
    let loader = DatasetLoader::new(&config);

    let err = loader.load("Faulty").unwrap_err();
    assert!(err.is_data_access());
    assert_eq!(err.error_code(), "DATA_ACCESS_ERROR");
    assert!(!loader.is_cached("Faulty"));
}

#[test]
fn test_config_file_overrides_defaults() {
    let mut config = AnalysisConfig::from_json_file(fixtures_path().join("analysis-config.json"))
        .unwrap();
    config.data_dir = fixtures_path();

    assert_eq!(config.stations.len(), 2);
    assert_eq!(config.iqr_multiplier, 3.0);
    assert_eq!(config.wind_sectors, 8);
    assert_eq!(config.zscore_threshold, 3.0);

    let loader = DatasetLoader::new(&config);
    assert_eq!(loader.stations(), vec!["Benin", "Togo"]);
    assert!(loader.load("Sierraleone").is_err());
}

// ============================================================================
// Quality and Cleaning
// ============================================================================

#[test]
fn test_quality_report_on_station() {
    let config = fixture_config();
    let report = DataQualityAnalyzer::analyze(&load("Benin"), &config).unwrap();

    assert_eq!(report.row_count, 12);
    assert_eq!(report.missing_values["GHI"], 1);
    assert_eq!(report.missing_values["WS"], 1);
    assert_eq!(report.missing_values["Comments"], 12);
    assert_eq!(report.missing_values["Tamb"], 0);

    assert_eq!(report.invalid_values["GHI"], 4);
    assert_eq!(report.invalid_values["DNI"], 2);
    assert_eq!(report.invalid_values["DHI"], 4);
    assert_eq!(report.invalid_values["WS"], 0);

    // masks stay aligned with the table
    for mask in report.iqr_outlier_mask.values() {
        assert_eq!(mask.len(), 12);
    }
    assert!(report.has_issues());
}

#[test]
fn test_drop_incomplete_on_station() {
    let config = fixture_config();
    let (cleaned, summary) =
        DataCleaner::drop_incomplete_with_summary(&load("Benin"), &config).unwrap();

    assert_eq!(cleaned.height(), 10);
    assert_eq!(summary.rows_removed, 2);

    let after = DataQualityAnalyzer::missing_report(&cleaned).unwrap();
    for column in &summary.columns_checked {
        assert_eq!(after[column], 0, "column {column}");
    }
    // non-critical gaps survive
    assert_eq!(after["Comments"], 10);
}

// ============================================================================
// Time Series
// ============================================================================

#[test]
fn test_hourly_time_series_on_station() {
    let series = time_series(&load("Benin"), Resolution::Hourly)
        .unwrap()
        .unwrap();
    let day = NaiveDate::from_ymd_opt(2021, 8, 9).unwrap();

    assert_eq!(series.columns, vec!["GHI", "DNI", "DHI", "Tamb"]);
    assert_eq!(series.buckets.len(), 11);
    assert_eq!(series.buckets[0].start, day.and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(series.buckets[0].rows, 2);

    // GHI is blank in the 10:00 reading
    let ten = &series.buckets[3];
    assert_eq!(ten.start, day.and_hms_opt(10, 0, 0).unwrap());
    assert_eq!(ten.values["GHI"].count, 0);
    assert_eq!(ten.values["DNI"].max, Some(410.6));

    assert_eq!(
        series.peak("GHI"),
        Some((day.and_hms_opt(13, 0, 0).unwrap(), 920.7))
    );
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_station_report_end_to_end() {
    let config = fixture_config();
    let report = ReportGenerator::build_station_report("Benin", &load("Benin"), &config).unwrap();

    assert_eq!(report.rows, 12);
    assert!(report.missing_columns.is_empty());
    assert_eq!(report.rows_after_cleaning(), 10);

    let matrix = report.correlation.matrix().unwrap();
    assert_eq!(matrix.columns.len(), 8);
    let r = matrix.get("GHI", "DNI").unwrap();
    assert!(r > 0.9, "GHI/DNI correlation {r}");

    let rose = report.wind_rose.as_ref().unwrap();
    assert_eq!(rose.sectors.len(), 16);
    assert_eq!(rose.samples, 10);

    let impact = report.cleaning_impact.as_ref().unwrap();
    assert_eq!(impact.cleaned_rows, 1);
    assert_eq!(impact.not_cleaned_rows, 9);
    assert_eq!(impact.modules[0].column, "ModA");
    assert_eq!(impact.modules[0].mean_cleaned, Some(915.6));

    let series = report.time_series.as_ref().unwrap();
    assert_eq!(series.resolution, Resolution::Daily);
    assert_eq!(series.buckets.len(), 1);
    assert_eq!(series.buckets[0].rows, 10);
    assert_eq!(series.buckets[0].values["GHI"].max, Some(920.7));
    assert_eq!(series.buckets[0].values["Tamb"].count, 10);

    let bubble = report.bubble.as_ref().unwrap();
    assert_eq!(bubble.complete_rows, 10);
    assert_eq!(bubble.points.len(), 10);
    assert_eq!(
        bubble.points[0],
        BubblePoint {
            ghi: -1.2,
            tamb: 26.2,
            rh: 93.4,
            ws: 0.0
        }
    );
}

#[test]
fn test_reduced_station_skips_correlation() {
    let config = fixture_config();
    let report = ReportGenerator::build_station_report("Togo", &load("Togo"), &config).unwrap();

    match &report.correlation {
        CorrelationOutcome::Skipped { present, .. } => assert_eq!(present, &vec!["GHI"]),
        other => panic!("expected skipped correlation, got {other:?}"),
    }
    assert!(!report.scope.is_ready());
    assert_eq!(report.rows_after_cleaning(), 3);
    assert!(report.wind_rose.is_none());
    assert!(report.cleaning_impact.is_none());

    // no DNI/DHI or WS in the reduced log
    let series = report.time_series.as_ref().unwrap();
    assert_eq!(series.columns, vec!["GHI", "Tamb"]);
    assert_eq!(series.buckets[0].rows, 3);
    assert_eq!(series.buckets[0].values["GHI"].max, Some(812.4));
    assert!(report.bubble.is_none());
}

#[test]
fn test_emitted_report_round_trips() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config();
    let generator = ReportGenerator::new(dir.path());

    let report = ReportGenerator::build_station_report("Togo", &load("Togo"), &config).unwrap();
    let path = generator.write_report_to_file(&report, "Togo").unwrap();

    let text = std::fs::read_to_string(path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["station"], "Togo");
    assert_eq!(json["correlation"]["status"], "skipped");
    assert_eq!(json["quality"]["invalid_values"]["GHI"], 1);
    assert!(json["quality"].get("iqr_outlier_mask").is_none());
    assert_eq!(json["time_series"]["resolution"], "daily");
    assert_eq!(json["time_series"]["buckets"][0]["start"], "2021-10-25T00:00:00");
}
