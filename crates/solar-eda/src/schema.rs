//! Schema validation against the expected sensor vocabulary.
//!
//! Analysis only ever runs on the intersection of a configured column list and
//! the columns a station log actually carries. [`present_columns`] computes that
//! intersection once, in the configured order, so checks never need per-column
//! existence tests of their own.

use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Minimum number of columns needed for pairwise analysis.
pub const MIN_ANALYZABLE_COLUMNS: usize = 2;

/// Ordered sublist of `expected` that exists in `df`.
///
/// Ordering follows `expected`, not the table. Duplicate names in `expected`
/// are reported once.
pub fn present_columns<S: AsRef<str>>(df: &DataFrame, expected: &[S]) -> Vec<String> {
    let schema = df.schema();
    let mut present: Vec<String> = Vec::new();
    for name in expected {
        let name = name.as_ref();
        if schema.contains(name) && !present.iter().any(|p| p == name) {
            present.push(name.to_string());
        }
    }
    present
}

/// Ordered sublist of `expected` that is absent from `df`.
pub fn missing_columns<S: AsRef<str>>(df: &DataFrame, expected: &[S]) -> Vec<String> {
    let schema = df.schema();
    expected
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !schema.contains(name))
        .map(str::to_string)
        .collect()
}

/// Columns of `columns` present in `df` that cannot hold sensor readings.
///
/// A column passes when it has a numeric type or carries no values at all (a
/// CSV reader types an all-blank column as text).
pub fn non_numeric_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Vec<String> {
    present_columns(df, columns)
        .into_iter()
        .filter(|name| {
            df.column(name).is_ok_and(|column| {
                !is_numeric_dtype(column.dtype()) && column.null_count() < column.len()
            })
        })
        .collect()
}

/// Whether a table supports multi-column analysis.
///
/// `Skipped` is a valid, reduced-scope outcome rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisScope {
    Ready { columns: Vec<String> },
    Skipped { reason: String, present: Vec<String> },
}

impl AnalysisScope {
    pub fn assess<S: AsRef<str>>(df: &DataFrame, expected: &[S]) -> Self {
        let columns = present_columns(df, expected);
        if columns.len() >= MIN_ANALYZABLE_COLUMNS {
            AnalysisScope::Ready { columns }
        } else {
            AnalysisScope::Skipped {
                reason: format!(
                    "only {} of the expected columns present, need at least {}",
                    columns.len(),
                    MIN_ANALYZABLE_COLUMNS
                ),
                present: columns,
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AnalysisScope::Ready { .. })
    }
}
