use crate::error::Result;
use crate::profiler::statistics::mean;
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Flag column marking samples taken right after a panel cleaning event.
pub const CLEANING_FLAG: &str = "Cleaning";

/// Module sensors compared across cleaning states.
pub const MODULE_COLUMNS: [&str; 2] = ["ModA", "ModB"];

/// Mean reading of one module sensor with and without cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleComparison {
    pub column: String,
    pub mean_cleaned: Option<f64>,
    pub mean_not_cleaned: Option<f64>,
}

impl ModuleComparison {
    /// Difference `cleaned - not cleaned`, when both means exist.
    pub fn delta(&self) -> Option<f64> {
        Some(self.mean_cleaned? - self.mean_not_cleaned?)
    }
}

/// Module sensor readings split by the cleaning flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningImpact {
    pub cleaned_rows: usize,
    pub not_cleaned_rows: usize,
    pub modules: Vec<ModuleComparison>,
}

/// Compare `ModA`/`ModB` means for rows with `Cleaning == 1` and `Cleaning == 0`.
///
/// Returns `None` when the table has no cleaning flag. Module columns that are
/// absent are left out; rows with any other flag value are ignored.
pub fn cleaning_impact(df: &DataFrame) -> Result<Option<CleaningImpact>> {
    let schema = df.schema();
    if !schema.contains(CLEANING_FLAG) {
        return Ok(None);
    }

    let flags = numeric_values(df, CLEANING_FLAG)?;
    let cleaned_rows = flags.iter().filter(|f| **f == Some(1.0)).count();
    let not_cleaned_rows = flags.iter().filter(|f| **f == Some(0.0)).count();

    let mut modules = Vec::new();
    for column in MODULE_COLUMNS {
        if !schema.contains(column) {
            continue;
        }
        let readings = numeric_values(df, column)?;

        let mut cleaned = Vec::new();
        let mut not_cleaned = Vec::new();
        for (flag, reading) in flags.iter().zip(&readings) {
            match (flag, reading) {
                (Some(f), Some(r)) if *f == 1.0 => cleaned.push(*r),
                (Some(f), Some(r)) if *f == 0.0 => not_cleaned.push(*r),
                _ => {}
            }
        }

        modules.push(ModuleComparison {
            column: column.to_string(),
            mean_cleaned: mean(&cleaned),
            mean_not_cleaned: mean(&not_cleaned),
        });
    }

    Ok(Some(CleaningImpact {
        cleaned_rows,
        not_cleaned_rows,
        modules,
    }))
}
