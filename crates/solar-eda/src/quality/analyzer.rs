use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::profiler::statistics::{iqr_fences, mean, population_std, sorted};
use crate::schema::present_columns;
use crate::types::{ColumnCounts, ColumnMasks, QualityReport};
use crate::utils::{column_names, missing_count, numeric_values, present_values};
use polars::prelude::*;
use tracing::debug;

/// Data-quality checks over a station table.
///
/// Each check is a pure function of the table and can be called on its own.
/// Checks that target a configured column set run on the columns of that set
/// the table actually has; absent columns are left out of the result.
pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Run every check and collect the results.
    pub fn analyze(df: &DataFrame, config: &AnalysisConfig) -> Result<QualityReport> {
        let iqr_outlier_mask = Self::iqr_outlier_mask(df, config)?;
        let iqr_outlier_counts = iqr_outlier_mask
            .iter()
            .map(|(column, mask)| (column.clone(), mask.iter().filter(|f| **f).count()))
            .collect();

        Ok(QualityReport {
            row_count: df.height(),
            missing_values: Self::missing_report(df)?,
            invalid_values: Self::sign_validity_report(df, config)?,
            iqr_outlier_mask,
            iqr_outlier_counts,
            zscore_outlier_counts: Self::zscore_outlier_counts(df, config)?,
            zero_variance_columns: Self::zero_variance_columns(df, config)?,
        })
    }

    /// Count of missing entries (null, or NaN in float columns) for every column.
    pub fn missing_report(df: &DataFrame) -> Result<ColumnCounts> {
        let mut report = ColumnCounts::new();
        for name in column_names(df) {
            let count = missing_count(df.column(&name)?.as_materialized_series())?;
            report.insert(name, count);
        }
        Ok(report)
    }

    /// Count of values strictly below zero in each non-negative column.
    pub fn sign_validity_report(df: &DataFrame, config: &AnalysisConfig) -> Result<ColumnCounts> {
        let mut report = ColumnCounts::new();
        for column in present_columns(df, &config.non_negative_columns) {
            let negatives = present_values(df, &column)?
                .into_iter()
                .filter(|v| *v < 0.0)
                .count();
            if negatives > 0 {
                debug!("{} negative values in {}", negatives, column);
            }
            report.insert(column, negatives);
        }
        Ok(report)
    }

    /// Row-aligned IQR outlier flags for each screened column.
    ///
    /// A value is flagged when it lies below `Q1 - k*IQR` or above
    /// `Q3 + k*IQR`, with quartiles taken by linear interpolation over the
    /// non-missing values. Missing entries are never flagged. With zero IQR
    /// every value different from the quartile is flagged.
    pub fn iqr_outlier_mask(df: &DataFrame, config: &AnalysisConfig) -> Result<ColumnMasks> {
        let mut masks = ColumnMasks::new();
        for column in present_columns(df, &config.outlier_columns) {
            let values = numeric_values(df, &column)?;
            let present: Vec<f64> = values.iter().flatten().copied().collect();

            let mask = match iqr_fences(&sorted(&present), config.iqr_multiplier) {
                Some((lower, upper)) => values
                    .iter()
                    .map(|v| v.is_some_and(|x| x < lower || x > upper))
                    .collect(),
                None => vec![false; values.len()],
            };
            masks.insert(column, mask);
        }
        Ok(masks)
    }

    /// Count of values with `|z| > threshold` in each screened column.
    ///
    /// Mean and population standard deviation are taken over the non-missing
    /// values. When a column is constant or empty its Z-scores are undefined
    /// and none of them are counted.
    pub fn zscore_outlier_counts(df: &DataFrame, config: &AnalysisConfig) -> Result<ColumnCounts> {
        let mut counts = ColumnCounts::new();
        for column in present_columns(df, &config.outlier_columns) {
            let values = present_values(df, &column)?;
            let count = zscore_outliers(&values, config.zscore_threshold).unwrap_or_else(|| {
                debug!("Z-scores undefined for {}, excluded from outlier count", column);
                0
            });
            counts.insert(column, count);
        }
        Ok(counts)
    }

    /// Screened columns whose Z-scores are undefined.
    pub fn zero_variance_columns(df: &DataFrame, config: &AnalysisConfig) -> Result<Vec<String>> {
        let mut columns = Vec::new();
        for column in present_columns(df, &config.outlier_columns) {
            if !has_variance(&present_values(df, &column)?) {
                columns.push(column);
            }
        }
        Ok(columns)
    }
}

fn has_variance(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().any(|v| v != first),
        None => false,
    }
}

/// Number of values whose absolute Z-score exceeds `threshold`.
///
/// `None` when the Z-scores are undefined (no values, or all values equal).
fn zscore_outliers(values: &[f64], threshold: f64) -> Option<usize> {
    if !has_variance(values) {
        return None;
    }
    let mean = mean(values)?;
    let std = population_std(values)?;
    if std == 0.0 {
        return None;
    }

    Some(
        values
            .iter()
            .filter(|v| ((*v - mean) / std).abs() > threshold)
            .count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    // ==================== missing_report tests ====================

    #[test]
    fn test_missing_report_covers_all_columns() {
        let df = df![
            "GHI" => [Some(1.0), None, Some(f64::NAN)],
            "Comments" => [None::<&str>, None, Some("dusty")],
            "Cleaning" => [0i64, 1, 0],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::missing_report(&df).unwrap();
        assert_eq!(report.get("GHI"), Some(&2));
        assert_eq!(report.get("Comments"), Some(&2));
        assert_eq!(report.get("Cleaning"), Some(&0));
        assert_eq!(report.len(), 3);
    }

    // ==================== sign_validity_report tests ====================

    #[test]
    fn test_sign_validity_counts_negatives() {
        let df = df![
            "GHI" => [-1.2, 0.0, 5.0, -0.1],
            "DNI" => [0.0, 0.0, 1.0, 2.0],
            "Tamb" => [-5.0, -3.0, 1.0, 2.0],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::sign_validity_report(&df, &config()).unwrap();
        assert_eq!(report.get("GHI"), Some(&2));
        assert_eq!(report.get("DNI"), Some(&0));
        // Tamb can legitimately be negative
        assert!(!report.contains_key("Tamb"));
    }

    #[test]
    fn test_sign_validity_omits_absent_columns() {
        let df = df![
            "GHI" => [1.0, 2.0],
            "WS" => [0.5, -0.5],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::sign_validity_report(&df, &config()).unwrap();
        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["GHI", "WS"]);
        assert!(!report.contains_key("WD"));
        assert_eq!(report.get("WS"), Some(&1));
    }

    #[test]
    fn test_sign_validity_ignores_missing() {
        let df = df!["DHI" => [None, Some(-1.0), Some(f64::NAN)]].unwrap();
        let report = DataQualityAnalyzer::sign_validity_report(&df, &config()).unwrap();
        assert_eq!(report.get("DHI"), Some(&1));
    }

    // ==================== iqr_outlier_mask tests ====================

    #[test]
    fn test_iqr_flags_single_extreme() {
        let df = df!["GHI" => [1.0, 2.0, 3.0, 4.0, 100.0]].unwrap();

        let masks = DataQualityAnalyzer::iqr_outlier_mask(&df, &config()).unwrap();
        assert_eq!(masks["GHI"], vec![false, false, false, false, true]);
    }

    #[test]
    fn test_iqr_mask_aligned_with_nulls() {
        let df = df!["WS" => [Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(100.0)]].unwrap();

        let masks = DataQualityAnalyzer::iqr_outlier_mask(&df, &config()).unwrap();
        assert_eq!(masks["WS"], vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_iqr_zero_spread_flags_any_deviation() {
        let df = df!["ModA" => [5.0, 5.0, 5.0, 5.0, 5.0, 6.0]].unwrap();

        let masks = DataQualityAnalyzer::iqr_outlier_mask(&df, &config()).unwrap();
        assert_eq!(masks["ModA"], vec![false, false, false, false, false, true]);
    }

    #[test]
    fn test_iqr_constant_column_unflagged() {
        let df = df!["ModB" => [7.0, 7.0, 7.0]].unwrap();
        let masks = DataQualityAnalyzer::iqr_outlier_mask(&df, &config()).unwrap();
        assert_eq!(masks["ModB"], vec![false, false, false]);
    }

    #[test]
    fn test_iqr_empty_column() {
        let df = df!["GHI" => [None::<f64>, None]].unwrap();
        let masks = DataQualityAnalyzer::iqr_outlier_mask(&df, &config()).unwrap();
        assert_eq!(masks["GHI"], vec![false, false]);
    }

    #[test]
    fn test_iqr_rejects_text_column() {
        let df = df!["GHI" => ["high", "low"]].unwrap();
        let err = DataQualityAnalyzer::iqr_outlier_mask(&df, &config()).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
    }

    #[test]
    fn test_iqr_respects_configured_columns() {
        let df = df![
            "GHI" => [1.0, 2.0, 3.0, 4.0, 100.0],
            "RH" => [1.0, 2.0, 3.0, 4.0, 100.0],
        ]
        .unwrap();
        let config = AnalysisConfig::builder()
            .outlier_columns(["RH"])
            .build()
            .unwrap();

        let masks = DataQualityAnalyzer::iqr_outlier_mask(&df, &config).unwrap();
        assert_eq!(masks.keys().collect::<Vec<_>>(), vec!["RH"]);
    }

    // ==================== zscore_outlier_counts tests ====================

    #[test]
    fn test_zscore_counts_extreme_value() {
        let mut values = vec![10.0; 20];
        values.push(1000.0);
        let df = df!["DNI" => values].unwrap();

        let counts = DataQualityAnalyzer::zscore_outlier_counts(&df, &config()).unwrap();
        assert_eq!(counts.get("DNI"), Some(&1));
    }

    #[test]
    fn test_zscore_small_sample_has_no_outliers() {
        // with five values |z| can never exceed 2
        let df = df!["GHI" => [1.0, 2.0, 3.0, 4.0, 100.0]].unwrap();
        let counts = DataQualityAnalyzer::zscore_outlier_counts(&df, &config()).unwrap();
        assert_eq!(counts.get("GHI"), Some(&0));
    }

    #[test]
    fn test_zscore_constant_column_counts_zero() {
        let df = df!["WSgust" => [3.3, 3.3, 3.3, 3.3]].unwrap();

        let counts = DataQualityAnalyzer::zscore_outlier_counts(&df, &config()).unwrap();
        assert_eq!(counts.get("WSgust"), Some(&0));

        let zero_variance = DataQualityAnalyzer::zero_variance_columns(&df, &config()).unwrap();
        assert_eq!(zero_variance, vec!["WSgust"]);
    }

    #[test]
    fn test_zscore_all_missing_column() {
        let df = df!["ModB" => [None::<f64>, None, Some(f64::NAN)]].unwrap();

        let counts = DataQualityAnalyzer::zscore_outlier_counts(&df, &config()).unwrap();
        assert_eq!(counts.get("ModB"), Some(&0));
        assert_eq!(
            DataQualityAnalyzer::zero_variance_columns(&df, &config()).unwrap(),
            vec!["ModB"]
        );
    }

    #[test]
    fn test_zscore_ignores_missing_values() {
        let mut values: Vec<Option<f64>> = vec![Some(10.0); 20];
        values.push(None);
        values.push(Some(1000.0));
        let df = df!["DHI" => values].unwrap();

        let counts = DataQualityAnalyzer::zscore_outlier_counts(&df, &config()).unwrap();
        assert_eq!(counts.get("DHI"), Some(&1));
    }

    #[test]
    fn test_zscore_threshold_from_config() {
        let mut values = vec![10.0; 20];
        values.push(1000.0);
        let df = df!["DNI" => values].unwrap();
        let strict = AnalysisConfig::builder()
            .zscore_threshold(100.0)
            .build()
            .unwrap();

        let counts = DataQualityAnalyzer::zscore_outlier_counts(&df, &strict).unwrap();
        assert_eq!(counts.get("DNI"), Some(&0));
    }

    // ==================== analyze tests ====================

    #[test]
    fn test_analyze_combines_checks() {
        let df = df![
            "GHI" => [Some(-1.0), Some(2.0), Some(3.0), Some(4.0), Some(100.0)],
            "ModA" => [Some(1.0), Some(1.0), Some(1.0), Some(1.0), None],
            "Tamb" => [Some(20.0), Some(21.0), Some(22.0), Some(23.0), Some(24.0)],
        ]
        .unwrap();

        let report = DataQualityAnalyzer::analyze(&df, &config()).unwrap();
        assert_eq!(report.row_count, 5);
        assert_eq!(report.missing_values.get("ModA"), Some(&1));
        assert_eq!(report.invalid_values.get("GHI"), Some(&1));
        assert_eq!(report.iqr_outlier_counts.get("GHI"), Some(&1));
        assert_eq!(report.iqr_outlier_rows("GHI"), vec![4]);
        assert_eq!(report.zero_variance_columns, vec!["ModA"]);
        assert_eq!(report.zscore_outlier_counts.get("ModA"), Some(&0));
        assert!(!report.zscore_outlier_counts.contains_key("Tamb"));
    }

    #[test]
    fn test_zscore_outliers_helper() {
        assert_eq!(zscore_outliers(&[], 3.0), None);
        assert_eq!(zscore_outliers(&[2.0, 2.0], 3.0), None);
        assert_eq!(zscore_outliers(&[1.0, 2.0], 3.0), Some(0));
    }
}
