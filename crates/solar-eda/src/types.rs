use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics for one numeric column.
///
/// Computed over non-missing values; `std` uses the sample divisor `n - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Per-column counts keyed by column name.
pub type ColumnCounts = BTreeMap<String, usize>;

/// Per-column boolean masks aligned with table rows.
pub type ColumnMasks = BTreeMap<String, Vec<bool>>;

/// Output of the data-quality checks for one table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    /// Number of rows the checks ran over.
    pub row_count: usize,

    /// Missing entries for every column of the table.
    pub missing_values: ColumnCounts,

    /// Values below zero in physically non-negative columns.
    pub invalid_values: ColumnCounts,

    /// IQR outlier flags, row-aligned. Left out of serialized reports.
    #[serde(skip)]
    pub iqr_outlier_mask: ColumnMasks,

    /// Number of `true` entries per IQR mask.
    pub iqr_outlier_counts: ColumnCounts,

    /// Values with an absolute Z-score above the threshold.
    pub zscore_outlier_counts: ColumnCounts,

    /// Screened columns whose Z-scores are undefined (constant or empty).
    /// Their Z-score outlier count is always zero.
    pub zero_variance_columns: Vec<String>,
}

impl QualityReport {
    /// Row indices flagged by the IQR rule for a column.
    pub fn iqr_outlier_rows(&self, column: &str) -> Vec<usize> {
        self.iqr_outlier_mask
            .get(column)
            .map(|mask| {
                mask.iter()
                    .enumerate()
                    .filter_map(|(row, flagged)| flagged.then_some(row))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total missing entries across all columns.
    pub fn total_missing(&self) -> usize {
        self.missing_values.values().sum()
    }

    /// Whether any check found something worth reporting.
    pub fn has_issues(&self) -> bool {
        self.total_missing() > 0
            || self.invalid_values.values().any(|c| *c > 0)
            || self.iqr_outlier_counts.values().any(|c| *c > 0)
            || self.zscore_outlier_counts.values().any(|c| *c > 0)
    }
}
