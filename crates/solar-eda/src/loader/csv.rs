//! Delimited-text station source backed by the polars CSV reader.

use super::TableSource;
use crate::config::StationConfig;
use crate::error::{EdaError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rows scanned before column types are fixed.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Reads `<data_dir>/<station file>` as a headed CSV table.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    data_dir: PathBuf,
}

impl CsvTableSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

impl TableSource for CsvTableSource {
    fn read_table(&self, station: &StationConfig) -> Result<DataFrame> {
        let path = self.data_dir.join(&station.file);
        if !path.is_file() {
            return Err(EdaError::data_access(
                &station.id,
                format!("file not found: {}", path.display()),
            ));
        }

        read_csv_with_fallbacks(&path).map_err(|e| {
            EdaError::data_access(&station.id, format!("{}: {}", path.display(), e))
        })
    }
}

/// Read a CSV file, retrying without quote handling if the first parse fails.
pub fn read_csv_with_fallbacks(path: &Path) -> PolarsResult<DataFrame> {
    // Strategy 1: quote-aware parse
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed for {}: {}", path.display(), e);
        }
    }

    // Strategy 2: without quote handling
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(None))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}
