//! Tabular data exploration engine.
//!
//! This library powers the DataLens interactive shell. It provides:
//!
//! - **Source adapters** ([`sources`]): CSV files, shared spreadsheet
//!   links and PostgreSQL tables, each normalized into a Polars
//!   `DataFrame` wrapped in a [`LoadedDataset`].
//! - **Profiling** ([`profiler`]): per-column type inference and
//!   descriptive statistics, dataset composition, duplicate detection
//!   and Pearson correlations.
//! - **Reporting** ([`reporting`]): a self-contained HTML artifact
//!   written to a timestamped path under a reports directory.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datalens_processing::sources::load_csv_file;
//! use datalens_processing::{DataProfiler, ReportGenerator};
//!
//! let dataset = load_csv_file("data.csv".as_ref())?;
//! let profile = DataProfiler::default().profile(&dataset.df)?;
//!
//! let generator = ReportGenerator::new("./reports");
//! let path = generator.write_report(&dataset.name, &dataset.df, &profile)?;
//! println!("report at {}", path.display());
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns [`LensError`]; listing queries are
//! the one soft failure (`is_warning()`), which callers degrade to an
//! empty result with a warning instead of aborting the action.

pub mod config;
pub mod error;
pub mod profiler;
pub mod reporting;
pub mod sources;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::ProfileConfig;
pub use error::{LensError, Result};
pub use profiler::DataProfiler;
pub use reporting::ReportGenerator;
pub use types::{
    CategoryCount, ColumnProfile, CorrelationMatrix, DatasetProfile, HistogramBin, LoadedDataset,
    NumericSummary, SourceKind,
};
