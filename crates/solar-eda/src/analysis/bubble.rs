use crate::error::{EdaError, Result};
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Columns plotted by the bubble chart: x, y, size and colour.
pub const BUBBLE_COLUMNS: [&str; 4] = ["GHI", "Tamb", "RH", "WS"];

/// One bubble: irradiance against temperature, sized by humidity and
/// coloured by wind speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubblePoint {
    pub ghi: f64,
    pub tamb: f64,
    pub rh: f64,
    pub ws: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleChart {
    /// Rows with all four readings present.
    pub complete_rows: usize,
    /// Evenly strided sample of the complete rows, in table order.
    pub points: Vec<BubblePoint>,
}

/// Collect `GHI`/`Tamb`/`RH`/`WS` points, keeping at most `max_points`.
///
/// Returns `None` when any of the four columns is absent.
pub fn bubble_chart(df: &DataFrame, max_points: usize) -> Result<Option<BubbleChart>> {
    if max_points == 0 {
        return Err(EdaError::Configuration(
            "bubble chart needs room for at least one point".to_string(),
        ));
    }
    let schema = df.schema();
    if let Some(absent) = BUBBLE_COLUMNS.iter().find(|c| !schema.contains(c)) {
        debug!("Bubble chart skipped: {} column absent", absent);
        return Ok(None);
    }

    let [ghi, tamb, rh, ws] = BUBBLE_COLUMNS.map(|c| numeric_values(df, c));
    let (ghi, tamb, rh, ws) = (ghi?, tamb?, rh?, ws?);

    let complete: Vec<BubblePoint> = (0..df.height())
        .filter_map(|i| {
            Some(BubblePoint {
                ghi: ghi[i]?,
                tamb: tamb[i]?,
                rh: rh[i]?,
                ws: ws[i]?,
            })
        })
        .collect();

    let complete_rows = complete.len();
    let stride = complete_rows.div_ceil(max_points).max(1);
    let points = complete.into_iter().step_by(stride).collect();

    Ok(Some(BubbleChart {
        complete_rows,
        points,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather() -> DataFrame {
        df![
            "GHI" => [Some(10.0), Some(20.0), None, Some(40.0), Some(50.0)],
            "Tamb" => [25.0, 26.0, 27.0, 28.0, 29.0],
            "RH" => [80.0, 75.0, 70.0, 65.0, 60.0],
            "WS" => [Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)],
        ]
        .unwrap()
    }

    #[test]
    fn test_bubble_chart_keeps_complete_rows() {
        let chart = bubble_chart(&weather(), 100).unwrap().unwrap();

        assert_eq!(chart.complete_rows, 3);
        assert_eq!(
            chart.points[2],
            BubblePoint {
                ghi: 50.0,
                tamb: 29.0,
                rh: 60.0,
                ws: 5.0
            }
        );
    }

    #[test]
    fn test_bubble_chart_is_sampled() {
        let chart = bubble_chart(&weather(), 2).unwrap().unwrap();

        assert_eq!(chart.complete_rows, 3);
        let ghi: Vec<f64> = chart.points.iter().map(|p| p.ghi).collect();
        assert_eq!(ghi, vec![10.0, 50.0]);
    }

    #[test]
    fn test_bubble_chart_needs_all_columns() {
        let df = df!["GHI" => [1.0], "Tamb" => [20.0], "RH" => [50.0]].unwrap();
        assert!(bubble_chart(&df, 10).unwrap().is_none());
    }

    #[test]
    fn test_zero_points_rejected() {
        assert!(matches!(
            bubble_chart(&weather(), 0),
            Err(EdaError::Configuration(_))
        ));
    }
}
