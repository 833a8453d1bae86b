//! Error types for station loading and data-quality diagnostics.
//!
//! The taxonomy separates three failure families that callers are expected to
//! handle differently:
//!
//! - [`EdaError::DataAccess`]: a station's backing file is missing, unreadable
//!   or malformed.
//! - [`EdaError::Configuration`]: an unknown station was requested or the
//!   analysis configuration is invalid.
//! - [`EdaError::Schema`]: an operation needs columns that are entirely absent.
//!
//! Reduced-scope outcomes (a single analyzable column, a column missing from a
//! check, zero-variance data) are never reported through this type.
//!
//! Errors serialize as `{ code, message }` so a dashboard front end can branch
//! on the code.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the diagnostics toolkit.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Station data could not be read or parsed.
    #[error("Failed to access data for station '{station}': {reason}")]
    DataAccess { station: String, reason: String },

    /// Unknown station or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Required columns are absent or have an unusable type.
    #[error("Schema error: {0}")]
    Schema(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EdaError>,
    },
}

impl EdaError {
    /// Shorthand for a [`EdaError::DataAccess`] error.
    pub fn data_access(station: impl Into<String>, reason: impl ToString) -> Self {
        EdaError::DataAccess {
            station: station.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EdaError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for front-end handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataAccess { .. } => "DATA_ACCESS_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from reading station data.
    pub fn is_data_access(&self) -> bool {
        match self {
            Self::DataAccess { .. } => true,
            Self::WithContext { source, .. } => source.is_data_access(),
            _ => false,
        }
    }
}

impl Serialize for EdaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EdaError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for diagnostics operations.
pub type Result<T> = std::result::Result<T, EdaError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EdaError::Polars(e).with_context(context))
    }
}
