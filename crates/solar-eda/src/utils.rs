//! Shared utilities for column access and missing-value handling.
//!
//! Every check in the crate treats "missing" the same way: a null entry, or a
//! NaN in a floating-point column. The helpers here are the single place that
//! rule is encoded.

use crate::error::{EdaError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a floating-point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Names of all columns in the frame, in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Extract a column as optional `f64` values, aligned with the frame's rows.
///
/// Nulls and NaNs both come back as `None`. A column that is entirely empty is
/// accepted whatever its inferred type (CSV readers type an all-blank column
/// as a string); any other non-numeric column is a schema error.
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(column)?.as_materialized_series();

    if is_numeric_dtype(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        Ok(floats
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    } else if series.null_count() == series.len() {
        Ok(vec![None; series.len()])
    } else {
        Err(EdaError::Schema(format!(
            "column '{}' has non-numeric type {}",
            column,
            series.dtype()
        )))
    }
}

/// Non-missing values of a column, in row order.
pub fn present_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    Ok(numeric_values(df, column)?.into_iter().flatten().collect())
}

/// Per-row missing flags for a Series (null, or NaN in float columns).
pub fn missing_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    if is_float_dtype(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        Ok(floats
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(|x| x.is_nan()))
            .collect())
    } else {
        Ok(series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(true))
            .collect())
    }
}

/// Count of missing entries in a Series.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    Ok(missing_mask(series)?.into_iter().filter(|m| *m).count())
}
