//! Station report generation.
//!
//! [`StationReport`] gathers the profile, quality checks and analyses of one
//! station into a single value suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use solar_eda::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_station_report("Benin", &df, &config)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "Benin")?;
//! ```

mod generator;

pub use generator::{ReportGenerator, StationReport};
