//! Error types shared by the source adapters, the profiler and the
//! report generator.
//!
//! One enum covers the whole crate so the front end can convert any
//! failure into a user-visible message at a single boundary. Errors are
//! serializable so they can be logged or shipped as structured payloads.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for data loading, profiling and reporting.
#[derive(Error, Debug)]
pub enum LensError {
    /// Tabular content could not be parsed.
    #[error("Failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    /// A share link does not carry the supported edit-fragment pattern.
    #[error("Unsupported share link (expected an '/edit#gid=' link): {0}")]
    UnsupportedShareLink(String),

    /// Fetching a remote spreadsheet failed (network or HTTP status).
    #[error("Failed to fetch spreadsheet: {0}")]
    Fetch(String),

    /// Opening a database connection failed.
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// A catalog or table query failed. Non-fatal for listings, which
    /// degrade to an empty result with a warning.
    #[error("Database query failed: {0}")]
    Query(String),

    /// Report generation failed (profiling, rendering or disk write).
    #[error("Failed to generate report: {0}")]
    Generation(String),

    /// No dataset has been loaded yet.
    #[error("No data loaded")]
    NoDataLoaded,

    /// No database connection has been opened yet.
    #[error("No database connection")]
    NoConnection,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl LensError {
    /// Stable code for each error kind, for logs and structured output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "PARSE_ERROR",
            Self::UnsupportedShareLink(_) => "UNSUPPORTED_SHARE_LINK",
            Self::Fetch(_) => "FETCH_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Query(_) => "QUERY_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::NoConnection => "NO_CONNECTION",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }

    /// Whether the error degrades gracefully instead of failing the
    /// whole action. Listing queries fall back to an empty result.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

/// Errors serialize as a struct with `code` and `message` fields.
impl Serialize for LensError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("LensError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, LensError>;
