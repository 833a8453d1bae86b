use crate::error::{EdaError, Result};
use crate::profiler::statistics::mean;
use crate::utils::numeric_values;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wind direction column, degrees clockwise from north.
pub const WIND_DIRECTION: &str = "WD";
/// Wind speed column.
pub const WIND_SPEED: &str = "WS";

/// One direction sector of a wind rose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSector {
    /// Sector centre in degrees (0 = north).
    pub center_degrees: f64,
    pub count: usize,
    /// Share of all samples falling in this sector.
    pub frequency: f64,
    pub mean_speed: Option<f64>,
    pub max_speed: Option<f64>,
}

/// Wind speed aggregated by direction sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRose {
    pub sector_width_degrees: f64,
    /// Rows with both direction and speed present.
    pub samples: usize,
    pub sectors: Vec<WindSector>,
}

impl WindRose {
    /// Sector with the most samples.
    pub fn prevailing_sector(&self) -> Option<&WindSector> {
        self.sectors
            .iter()
            .filter(|s| s.count > 0)
            .max_by_key(|s| s.count)
    }
}

/// Sector index for a direction, with sectors centred on north.
fn sector_index(direction: f64, sectors: usize) -> usize {
    let width = 360.0 / sectors as f64;
    let shifted = (direction + width / 2.0).rem_euclid(360.0);
    ((shifted / width) as usize).min(sectors - 1)
}

/// Bin `WD`/`WS` samples into `sectors` equal direction sectors.
///
/// Returns `None` when either column is absent.
pub fn wind_rose(df: &DataFrame, sectors: usize) -> Result<Option<WindRose>> {
    if sectors == 0 {
        return Err(EdaError::Configuration(
            "wind rose needs at least one sector".to_string(),
        ));
    }
    let schema = df.schema();
    if !schema.contains(WIND_DIRECTION) || !schema.contains(WIND_SPEED) {
        debug!("Wind rose skipped: WD or WS column absent");
        return Ok(None);
    }

    let directions = numeric_values(df, WIND_DIRECTION)?;
    let speeds = numeric_values(df, WIND_SPEED)?;

    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); sectors];
    for (direction, speed) in directions.iter().zip(&speeds) {
        if let (Some(direction), Some(speed)) = (direction, speed) {
            buckets[sector_index(*direction, sectors)].push(*speed);
        }
    }

    let samples: usize = buckets.iter().map(Vec::len).sum();
    let width = 360.0 / sectors as f64;
    let sector_stats = buckets
        .into_iter()
        .enumerate()
        .map(|(i, speeds)| WindSector {
            center_degrees: i as f64 * width,
            count: speeds.len(),
            frequency: if samples > 0 {
                speeds.len() as f64 / samples as f64
            } else {
                0.0
            },
            mean_speed: mean(&speeds),
            max_speed: speeds.iter().copied().reduce(f64::max),
        })
        .collect();

    Ok(Some(WindRose {
        sector_width_degrees: width,
        samples,
        sectors: sector_stats,
    }))
}
