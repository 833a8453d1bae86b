use crate::error::Result;
use crate::profiler::statistics::pearson;
use crate::schema::AnalysisScope;
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Symmetric Pearson correlation matrix over pairwise-complete rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` and `columns[j]`;
    /// `None` when undefined (constant data or fewer than two shared rows).
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Off-diagonal pairs ordered by descending absolute correlation.
    pub fn strongest_pairs(&self) -> Vec<(String, String, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                if let Some(r) = self.values[i][j] {
                    pairs.push((self.columns[i].clone(), self.columns[j].clone(), r));
                }
            }
        }
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs
    }
}

/// Result of the correlation step.
///
/// `Skipped` is a warning-level outcome: too few expected columns exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrelationOutcome {
    Computed(CorrelationMatrix),
    Skipped { reason: String, present: Vec<String> },
}

impl CorrelationOutcome {
    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            CorrelationOutcome::Computed(matrix) => Some(matrix),
            CorrelationOutcome::Skipped { .. } => None,
        }
    }
}

/// Correlate the expected columns present in the table.
pub fn correlation_analysis<S: AsRef<str>>(
    df: &DataFrame,
    expected: &[S],
) -> Result<CorrelationOutcome> {
    let columns = match AnalysisScope::assess(df, expected) {
        AnalysisScope::Ready { columns } => columns,
        AnalysisScope::Skipped { reason, present } => {
            warn!("Correlation analysis skipped: {}", reason);
            return Ok(CorrelationOutcome::Skipped { reason, present });
        }
    };

    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| numeric_values(df, c))
        .collect::<Result<_>>()?;

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let pairs: Vec<(f64, f64)> = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Computed {}x{} correlation matrix", n, n);
    Ok(CorrelationOutcome::Computed(CorrelationMatrix { columns, values }))
}
