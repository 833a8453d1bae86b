//! Per-station dataset loading with a process-lifetime cache.
//!
//! A [`DatasetLoader`] knows a closed set of stations. The first request for a
//! station reads its table through a [`TableSource`], coerces the timestamp
//! column, and stores the result; later requests return the stored table
//! without touching the source again. Entries are never invalidated, since
//! station files are treated as immutable for the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use solar_eda::{AnalysisConfig, DatasetLoader};
//!
//! let loader = DatasetLoader::new(&AnalysisConfig::default());
//! let benin = loader.load("Benin")?;
//! let again = loader.load("Benin")?; // served from the cache
//! ```

mod csv;
mod timestamps;

pub use csv::{CsvTableSource, read_csv_with_fallbacks};
pub use timestamps::{coerce_timestamps, parse_timestamp};

use crate::config::{AnalysisConfig, StationConfig};
use crate::error::{EdaError, Result};
use crate::schema::non_numeric_columns;
use parking_lot::Mutex;
use polars::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Backing store for station tables.
///
/// Implementations report unreadable or malformed data as
/// [`EdaError::DataAccess`].
pub trait TableSource: Send + Sync {
    fn read_table(&self, station: &StationConfig) -> Result<DataFrame>;
}

/// Loads station datasets and caches them by station id.
pub struct DatasetLoader {
    stations: Vec<StationConfig>,
    source: Arc<dyn TableSource>,
    /// Columns that must parse as numbers for a table to count as readable.
    sensor_columns: Vec<String>,
    cache: Mutex<HashMap<String, DataFrame>>,
}

impl DatasetLoader {
    /// Loader over the configured stations, reading CSV files from `data_dir`.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self::with_source(
            config.stations.clone(),
            Arc::new(CsvTableSource::new(config.data_dir.clone())),
        )
        .with_sensor_columns(config.sensor_columns())
    }

    /// Loader with a custom table source, checking the default sensor columns.
    pub fn with_source(stations: Vec<StationConfig>, source: Arc<dyn TableSource>) -> Self {
        Self {
            stations,
            source,
            sensor_columns: AnalysisConfig::default().sensor_columns(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the columns that must hold numeric readings.
    pub fn with_sensor_columns(mut self, columns: Vec<String>) -> Self {
        self.sensor_columns = columns;
        self
    }

    /// Configured station ids, in configuration order.
    pub fn stations(&self) -> Vec<&str> {
        self.stations.iter().map(|s| s.id.as_str()).collect()
    }

    /// Whether a station's table is already cached.
    pub fn is_cached(&self, station_id: &str) -> bool {
        self.cache.lock().contains_key(station_id)
    }

    /// Return a station's dataset, reading it on first access.
    ///
    /// Fails with [`EdaError::Configuration`] for an unconfigured id (before any
    /// I/O) and with [`EdaError::DataAccess`] when the source cannot be read or
    /// a sensor column holds text. Failed reads are not cached.
    pub fn load(&self, station_id: &str) -> Result<DataFrame> {
        let station = self
            .stations
            .iter()
            .find(|s| s.id == station_id)
            .ok_or_else(|| {
                EdaError::Configuration(format!(
                    "unknown station '{}' (configured: {})",
                    station_id,
                    self.stations().join(", ")
                ))
            })?;

        // Held across the read so concurrent callers never read a station twice.
        let mut cache = self.cache.lock();
        if let Some(df) = cache.get(station_id) {
            debug!("Cache hit for station {}", station_id);
            return Ok(df.clone());
        }

        info!("Loading dataset for station {}", station_id);
        let mut df = self.source.read_table(station).map_err(|e| {
            if e.is_data_access() {
                e
            } else {
                EdaError::data_access(&station.id, e)
            }
        })?;

        let coerced =
            coerce_timestamps(&mut df).map_err(|e| EdaError::data_access(&station.id, e))?;
        if !coerced.is_empty() {
            debug!("Coerced timestamp columns {:?} for {}", coerced, station_id);
        }

        let malformed = non_numeric_columns(&df, &self.sensor_columns);
        if !malformed.is_empty() {
            return Err(EdaError::data_access(
                &station.id,
                format!("non-numeric values in sensor columns: {}", malformed.join(", ")),
            ));
        }

        info!(
            "Station {} loaded: {} rows x {} columns",
            station_id,
            df.height(),
            df.width()
        );
        cache.insert(station.id.clone(), df.clone());
        Ok(df)
    }
}
