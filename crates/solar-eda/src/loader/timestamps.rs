//! Coercion of textual sample timestamps into a datetime column.

use crate::config::TIMESTAMP_COLUMNS;
use crate::error::{EdaError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a single timestamp in one of the accepted layouts.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Replace string `Timestamp`/`Time` columns with `Datetime(ms)` columns.
///
/// Blank entries become null. Returns the names of the converted columns.
/// Columns that already carry a non-string type are left alone.
pub fn coerce_timestamps(df: &mut DataFrame) -> Result<Vec<String>> {
    let mut coerced = Vec::new();

    for name in TIMESTAMP_COLUMNS {
        let Ok(column) = df.column(name) else {
            continue;
        };
        if !matches!(column.dtype(), DataType::String) {
            continue;
        }

        let text = column.as_materialized_series().str()?;
        let mut millis: Vec<Option<i64>> = Vec::with_capacity(text.len());
        for (row, raw) in text.into_iter().enumerate() {
            match raw.map(str::trim) {
                None | Some("") => millis.push(None),
                Some(value) => {
                    let parsed = parse_timestamp(value).ok_or_else(|| {
                        EdaError::Schema(format!(
                            "unparseable timestamp '{}' in column '{}' at row {}",
                            value, name, row
                        ))
                    })?;
                    millis.push(Some(parsed.and_utc().timestamp_millis()));
                }
            }
        }

        let parsed = Series::new(name.into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        df.replace(name, parsed)?;
        coerced.push(name.to_string());
    }

    Ok(coerced)
}
