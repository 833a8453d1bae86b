//! Configuration for station loading and diagnostics.
//!
//! Column classification lives here rather than in the checks themselves:
//! which columns are physically non-negative, which are screened for outliers,
//! which disqualify a row when missing, and which feed correlation analysis.
//! Use [`AnalysisConfig::builder()`] for a validated configuration or
//! [`AnalysisConfig::from_json_file`] to load one from disk.

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Columns used for correlation analysis, in canonical order.
pub const DEFAULT_EXPECTED_COLUMNS: [&str; 8] =
    ["GHI", "DNI", "DHI", "TModA", "TModB", "WS", "WSgust", "WD"];

/// Columns where a negative reading is physically invalid.
pub const DEFAULT_NON_NEGATIVE_COLUMNS: [&str; 5] = ["GHI", "DNI", "DHI", "WS", "WSgust"];

/// Columns screened by the IQR and Z-score outlier checks.
pub const DEFAULT_OUTLIER_COLUMNS: [&str; 7] = ["GHI", "DNI", "DHI", "ModA", "ModB", "WS", "WSgust"];

/// Columns whose missing values disqualify a row.
pub const DEFAULT_CRITICAL_COLUMNS: [&str; 7] =
    ["GHI", "DNI", "DHI", "ModA", "ModB", "WS", "WSgust"];

/// Names recognised as the sample timestamp, in lookup order.
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["Timestamp", "Time"];

/// One measurement station and the file holding its log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Station identifier used for lookups (e.g. "Benin").
    pub id: String,
    /// File name, resolved relative to [`AnalysisConfig::data_dir`].
    pub file: PathBuf,
}

impl StationConfig {
    pub fn new(id: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
        }
    }
}

fn default_stations() -> Vec<StationConfig> {
    vec![
        StationConfig::new("Benin", "benin-malanville.csv"),
        StationConfig::new("Sierraleone", "sierraleone-bumbuna.csv"),
        StationConfig::new("Togo", "togo-dapaong_qc.csv"),
    ]
}

fn to_strings(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

/// Configuration for the diagnostics toolkit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Directory holding the station files.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Configured stations. Requests for any other id are rejected.
    pub stations: Vec<StationConfig>,

    /// Expected columns for correlation analysis, in canonical order.
    pub expected_columns: Vec<String>,

    /// Columns where values below zero are counted as invalid.
    pub non_negative_columns: Vec<String>,

    /// Columns screened for statistical outliers.
    pub outlier_columns: Vec<String>,

    /// Columns whose missing values cause a row to be dropped.
    pub critical_columns: Vec<String>,

    /// Fence multiplier for the IQR rule.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Absolute Z-score above which a value counts as an outlier.
    /// Default: 3.0
    pub zscore_threshold: f64,

    /// Number of direction sectors in the wind rose.
    /// Default: 16
    pub wind_sectors: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            stations: default_stations(),
            expected_columns: to_strings(&DEFAULT_EXPECTED_COLUMNS),
            non_negative_columns: to_strings(&DEFAULT_NON_NEGATIVE_COLUMNS),
            outlier_columns: to_strings(&DEFAULT_OUTLIER_COLUMNS),
            critical_columns: to_strings(&DEFAULT_CRITICAL_COLUMNS),
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
            wind_sectors: 16,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EdaError::Configuration(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let config: AnalysisConfig = serde_json::from_str(&text).map_err(|e| {
            EdaError::Configuration(format!("invalid config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a configured station by id.
    pub fn station(&self, id: &str) -> Option<&StationConfig> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Columns that must hold numeric sensor readings: the union of the
    /// outlier, non-negative and critical sets, first occurrence wins.
    pub fn sensor_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for name in self
            .outlier_columns
            .iter()
            .chain(&self.non_negative_columns)
            .chain(&self.critical_columns)
        {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        columns
    }

    /// Full path of a station's backing file.
    pub fn station_path(&self, station: &StationConfig) -> PathBuf {
        self.data_dir.join(&station.file)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "iqr_multiplier".to_string(),
                value: self.iqr_multiplier,
            });
        }

        if !(self.zscore_threshold.is_finite() && self.zscore_threshold > 0.0) {
            return Err(ConfigValidationError::InvalidMultiplier {
                field: "zscore_threshold".to_string(),
                value: self.zscore_threshold,
            });
        }

        if self.wind_sectors == 0 {
            return Err(ConfigValidationError::InvalidWindSectors(self.wind_sectors));
        }

        let column_sets = [
            ("expected_columns", &self.expected_columns),
            ("non_negative_columns", &self.non_negative_columns),
            ("outlier_columns", &self.outlier_columns),
            ("critical_columns", &self.critical_columns),
        ];
        for (field, columns) in column_sets {
            if columns.is_empty() {
                return Err(ConfigValidationError::EmptyColumnSet(field.to_string()));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for station in &self.stations {
            if station.id.trim().is_empty() {
                return Err(ConfigValidationError::EmptyStationId);
            }
            if !seen.insert(station.id.as_str()) {
                return Err(ConfigValidationError::DuplicateStation(station.id.clone()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be a positive number)")]
    InvalidMultiplier { field: String, value: f64 },

    #[error("Invalid wind sector count: {0} (must be at least 1)")]
    InvalidWindSectors(usize),

    #[error("Column set '{0}' must not be empty")]
    EmptyColumnSet(String),

    #[error("Station id must not be empty")]
    EmptyStationId,

    #[error("Station '{0}' is configured more than once")]
    DuplicateStation(String),
}

impl From<ConfigValidationError> for EdaError {
    fn from(err: ConfigValidationError) -> Self {
        EdaError::Configuration(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    data_dir: Option<PathBuf>,
    stations: Option<Vec<StationConfig>>,
    expected_columns: Option<Vec<String>>,
    non_negative_columns: Option<Vec<String>>,
    outlier_columns: Option<Vec<String>>,
    critical_columns: Option<Vec<String>>,
    iqr_multiplier: Option<f64>,
    zscore_threshold: Option<f64>,
    wind_sectors: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Set the directory holding station files.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Replace the configured stations.
    pub fn stations(mut self, stations: Vec<StationConfig>) -> Self {
        self.stations = Some(stations);
        self
    }

    /// Add a single station to the configured set.
    pub fn station(mut self, id: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        self.stations
            .get_or_insert_with(Vec::new)
            .push(StationConfig::new(id, file));
        self
    }

    pub fn expected_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.expected_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn non_negative_columns<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.non_negative_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn outlier_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.outlier_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn critical_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.critical_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the IQR fence multiplier.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the absolute Z-score outlier threshold.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Set the number of wind-rose sectors.
    pub fn wind_sectors(mut self, sectors: usize) -> Self {
        self.wind_sectors = Some(sectors);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            stations: self.stations.unwrap_or(defaults.stations),
            expected_columns: self.expected_columns.unwrap_or(defaults.expected_columns),
            non_negative_columns: self
                .non_negative_columns
                .unwrap_or(defaults.non_negative_columns),
            outlier_columns: self.outlier_columns.unwrap_or(defaults.outlier_columns),
            critical_columns: self.critical_columns.unwrap_or(defaults.critical_columns),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(defaults.iqr_multiplier),
            zscore_threshold: self.zscore_threshold.unwrap_or(defaults.zscore_threshold),
            wind_sectors: self.wind_sectors.unwrap_or(defaults.wind_sectors),
        };

        config.validate()?;
        Ok(config)
    }
}
