//! Exploratory analyses feeding the dashboard views.
//!
//! Each function turns a (usually cleaned) station table into the numbers a
//! chart needs: a correlation matrix, wind-rose sectors, module readings
//! split by cleaning events, time-bucketed irradiance, or bubble-chart points.
//! Rendering is left to the caller.

mod bubble;
mod cleaning_impact;
mod correlation;
mod time_series;
mod wind;

pub use bubble::{BubbleChart, BubblePoint, bubble_chart};
pub use cleaning_impact::{CleaningImpact, ModuleComparison, cleaning_impact};
pub use correlation::{CorrelationMatrix, CorrelationOutcome, correlation_analysis};
pub use time_series::{ColumnAggregate, Resolution, TimeBucket, TimeSeries, time_series};
pub use wind::{WindRose, WindSector, wind_rose};
