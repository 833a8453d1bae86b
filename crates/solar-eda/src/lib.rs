//! Solar Station EDA Library
//!
//! Exploratory data analysis for solar irradiance measurement stations, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! Each station publishes a CSV log of irradiance (`GHI`, `DNI`, `DHI`),
//! module readings (`ModA`, `ModB`, `TModA`, `TModB`), weather (`Tamb`, `RH`,
//! `BP`, `Precipitation`) and wind (`WS`, `WSgust`, `WD`). This library provides:
//!
//! - **Loading**: Cached per-station CSV loading with timestamp coercion
//! - **Schema Validation**: Intersection of configured columns with the table
//! - **Data Quality**: Missing counts, sign validity, IQR and Z-score outliers
//! - **Cleaning**: Dropping rows with missing critical sensor values
//! - **Analysis**: Summary statistics, correlation, wind rose, cleaning impact,
//!   daily time series and bubble-chart points
//! - **Reporting**: One serialisable report per station
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use solar_eda::{AnalysisConfig, DataCleaner, DataQualityAnalyzer, DatasetLoader};
//!
//! let config = AnalysisConfig::builder().data_dir("data").build()?;
//! let loader = DatasetLoader::new(&config);
//!
//! let df = loader.load("Benin")?;
//! let quality = DataQualityAnalyzer::analyze(&df, &config)?;
//! println!("Missing values: {}", quality.total_missing());
//!
//! let cleaned = DataCleaner::drop_incomplete(&df, &config)?;
//! println!("Rows after cleaning: {}", cleaned.height());
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to change stations, column sets or thresholds:
//!
//! ```rust,ignore
//! use solar_eda::config::*;
//!
//! let config = AnalysisConfig::builder()
//!     .station("Benin", "benin-malanville.csv")
//!     .iqr_multiplier(3.0)                 // Only extreme outliers
//!     .zscore_threshold(2.5)
//!     .wind_sectors(8)
//!     .build()?;
//! ```
//!
//! # Reports
//!
//! ```rust,ignore
//! use solar_eda::ReportGenerator;
//!
//! let report = ReportGenerator::build_station_report("Benin", &df, &config)?;
//! ReportGenerator::new("reports").write_report_to_file(&report, "Benin")?;
//! ```

pub mod analysis;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analysis::{
    BubbleChart, BubblePoint, CleaningImpact, ColumnAggregate, CorrelationMatrix,
    CorrelationOutcome, ModuleComparison, Resolution, TimeBucket, TimeSeries, WindRose, WindSector,
    bubble_chart, cleaning_impact, correlation_analysis, time_series, wind_rose,
};
pub use cleaner::{CleaningSummary, DataCleaner};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, StationConfig};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use loader::{CsvTableSource, DatasetLoader, TableSource};
pub use profiler::DataProfiler;
pub use quality::DataQualityAnalyzer;
pub use reporting::{ReportGenerator, StationReport};
pub use schema::{AnalysisScope, missing_columns, present_columns};
pub use types::{ColumnCounts, ColumnMasks, ColumnSummary, QualityReport};
