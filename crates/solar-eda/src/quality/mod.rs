//! Data quality analysis module.
//!
//! This module provides the checks run over station tables: missing values,
//! sign validity of non-negative sensors, and IQR / Z-score outlier detection.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;
