use crate::config::TIMESTAMP_COLUMNS;
use crate::error::Result;
use crate::profiler::statistics::mean;
use crate::schema::present_columns;
use crate::utils::numeric_values;
use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Irradiance and temperature columns followed over time.
pub const TIME_SERIES_COLUMNS: [&str; 4] = ["GHI", "DNI", "DHI", "Tamb"];

/// Width of a time-series bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Hourly,
    Daily,
}

impl Resolution {
    fn bucket_start(self, at: NaiveDateTime) -> NaiveDateTime {
        match self {
            Resolution::Hourly => at.date().and_hms_opt(at.hour(), 0, 0).unwrap_or(at),
            Resolution::Daily => at.date().and_time(NaiveTime::MIN),
        }
    }
}

/// Mean and peak of one column inside a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAggregate {
    /// Non-missing readings in the bucket.
    pub count: usize,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: NaiveDateTime,
    pub rows: usize,
    pub values: BTreeMap<String, ColumnAggregate>,
}

/// Sensor readings aggregated into consecutive time buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub timestamp_column: String,
    pub resolution: Resolution,
    pub columns: Vec<String>,
    /// Ordered by start time; buckets without rows are not emitted.
    pub buckets: Vec<TimeBucket>,
}

impl TimeSeries {
    /// Bucket with the highest mean for `column`.
    pub fn peak(&self, column: &str) -> Option<(NaiveDateTime, f64)> {
        self.buckets
            .iter()
            .filter_map(|b| Some((b.start, b.values.get(column)?.mean?)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// First timestamp column that already holds datetimes.
fn datetime_column(df: &DataFrame) -> Option<(String, TimeUnit)> {
    TIMESTAMP_COLUMNS
        .iter()
        .find_map(|name| match df.column(name).ok()?.dtype() {
            DataType::Datetime(unit, _) => Some((name.to_string(), *unit)),
            _ => None,
        })
}

fn to_millis(value: i64, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Nanoseconds => value.div_euclid(1_000_000),
        TimeUnit::Microseconds => value.div_euclid(1_000),
        TimeUnit::Milliseconds => value,
    }
}

/// Aggregate `GHI`, `DNI`, `DHI` and `Tamb` per hour or per day.
///
/// Rows with a null timestamp are skipped. Returns `None` when the table has
/// no datetime `Timestamp`/`Time` column or none of the series columns.
pub fn time_series(df: &DataFrame, resolution: Resolution) -> Result<Option<TimeSeries>> {
    let Some((timestamp_column, unit)) = datetime_column(df) else {
        debug!("Time series skipped: no datetime timestamp column");
        return Ok(None);
    };
    let columns = present_columns(df, &TIME_SERIES_COLUMNS);
    if columns.is_empty() {
        debug!("Time series skipped: no irradiance or temperature column");
        return Ok(None);
    }

    let readings = columns
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<Result<Vec<_>>>()?;
    let ticks = df
        .column(&timestamp_column)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;

    let mut grouped: BTreeMap<NaiveDateTime, (usize, Vec<Vec<f64>>)> = BTreeMap::new();
    for (row, tick) in ticks.i64()?.into_iter().enumerate() {
        let Some(at) = tick.and_then(|t| DateTime::from_timestamp_millis(to_millis(t, unit)))
        else {
            continue;
        };
        let (rows, samples) = grouped
            .entry(resolution.bucket_start(at.naive_utc()))
            .or_insert_with(|| (0, vec![Vec::new(); columns.len()]));
        *rows += 1;
        for (values, column) in samples.iter_mut().zip(&readings) {
            if let Some(v) = column[row] {
                values.push(v);
            }
        }
    }

    let buckets = grouped
        .into_iter()
        .map(|(start, (rows, samples))| TimeBucket {
            start,
            rows,
            values: columns
                .iter()
                .zip(samples)
                .map(|(name, values)| {
                    let aggregate = ColumnAggregate {
                        count: values.len(),
                        mean: mean(&values),
                        max: values.iter().copied().reduce(f64::max),
                    };
                    (name.clone(), aggregate)
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    debug!(
        "Time series over {}: {} {:?} buckets",
        timestamp_column,
        buckets.len(),
        resolution
    );

    Ok(Some(TimeSeries {
        timestamp_column,
        resolution,
        columns,
        buckets,
    }))
}
