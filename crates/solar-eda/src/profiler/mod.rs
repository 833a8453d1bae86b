//! Descriptive profiling of station datasets.
//!
//! This module provides:
//! - Summary statistics for every numeric column (count, mean, std, quartiles)
//! - Shared statistical primitives used by the quality and analysis modules

pub mod statistics;

use crate::error::Result;
use crate::types::ColumnSummary;
use crate::utils::{column_names, is_numeric_dtype, missing_count, present_values};
use polars::prelude::*;
use statistics::{mean, quantile_linear, sample_std, sorted};

/// Data profiler for station datasets.
pub struct DataProfiler;

impl DataProfiler {
    /// Summary statistics for every numeric column, in table order.
    ///
    /// Non-numeric columns (timestamps, comments) are skipped.
    pub fn summary_statistics(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
        let mut summaries = Vec::new();

        for name in column_names(df) {
            let series = df.column(&name)?.as_materialized_series();
            if !is_numeric_dtype(series.dtype()) {
                continue;
            }

            let missing = missing_count(series)?;
            let values = present_values(df, &name)?;
            summaries.push(Self::summarize(name, &values, missing));
        }

        Ok(summaries)
    }

    fn summarize(name: String, values: &[f64], missing: usize) -> ColumnSummary {
        let ordered = sorted(values);
        ColumnSummary {
            name,
            count: values.len(),
            missing,
            mean: mean(values),
            std: sample_std(values),
            min: ordered.first().copied(),
            q25: quantile_linear(&ordered, 0.25),
            median: quantile_linear(&ordered, 0.5),
            q75: quantile_linear(&ordered, 0.75),
            max: ordered.last().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_statistics_numeric_only() {
        let df = df![
            "Timestamp" => ["a", "b", "c", "d"],
            "GHI" => [Some(1.0), Some(2.0), None, Some(4.0)],
            "Cleaning" => [0i64, 0, 1, 0],
        ]
        .unwrap();

        let summaries = DataProfiler::summary_statistics(&df).unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["GHI", "Cleaning"]);

        let ghi = &summaries[0];
        assert_eq!(ghi.count, 3);
        assert_eq!(ghi.missing, 1);
        assert_eq!(ghi.min, Some(1.0));
        assert_eq!(ghi.max, Some(4.0));
        assert_eq!(ghi.median, Some(2.0));
        assert_eq!(ghi.q25, Some(1.5));
        assert_eq!(ghi.q75, Some(3.0));
    }

    #[test]
    fn test_summary_statistics_empty_column() {
        let df = df!["WS" => [None::<f64>, None]].unwrap();
        let summaries = DataProfiler::summary_statistics(&df).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].count, 0);
        assert_eq!(summaries[0].missing, 2);
        assert_eq!(summaries[0].mean, None);
        assert_eq!(summaries[0].std, None);
    }
}
