//! Missing-data cleaning policy.
//!
//! Rows with a missing value in any critical sensor column are dropped; all
//! other rows are kept in their original order with every value untouched.
//! The policy is idempotent.

use crate::config::AnalysisConfig;
use crate::error::{EdaError, Result};
use crate::schema::present_columns;
use crate::utils::missing_mask;
use polars::prelude::*;
use tracing::{debug, info};

/// Outcome of a cleaning pass, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    /// Critical columns present in the table and used for filtering.
    pub columns_checked: Vec<String>,
}

/// Data cleaner applying the critical-column policy.
pub struct DataCleaner;

impl DataCleaner {
    /// Return a new table without rows that miss a critical value.
    ///
    /// Fails with [`EdaError::Schema`] when none of the configured critical
    /// columns exist in the table.
    pub fn drop_incomplete(df: &DataFrame, config: &AnalysisConfig) -> Result<DataFrame> {
        Self::drop_incomplete_with_summary(df, config).map(|(cleaned, _)| cleaned)
    }

    /// Same as [`DataCleaner::drop_incomplete`], also reporting what changed.
    pub fn drop_incomplete_with_summary(
        df: &DataFrame,
        config: &AnalysisConfig,
    ) -> Result<(DataFrame, CleaningSummary)> {
        let critical = present_columns(df, &config.critical_columns);
        if critical.is_empty() {
            return Err(EdaError::Schema(format!(
                "none of the critical columns [{}] exist in the table",
                config.critical_columns.join(", ")
            )));
        }

        let mut keep = vec![true; df.height()];
        for column in &critical {
            let missing = missing_mask(df.column(column)?.as_materialized_series())?;
            for (row, is_missing) in missing.into_iter().enumerate() {
                if is_missing {
                    keep[row] = false;
                }
            }
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let cleaned = df.filter(&mask)?;

        let rows_removed = df.height() - cleaned.height();
        if rows_removed > 0 {
            info!(
                "Dropped {} of {} rows with missing critical values",
                rows_removed,
                df.height()
            );
        } else {
            debug!("No rows with missing critical values");
        }

        let summary = CleaningSummary {
            rows_before: df.height(),
            rows_after: cleaned.height(),
            rows_removed,
            columns_checked: critical,
        };
        Ok((cleaned, summary))
    }
}
