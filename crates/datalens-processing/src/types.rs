//! Core data types shared by the source adapters, the profiler and the
//! report generator.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Which adapter produced the active dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local CSV file.
    File,
    /// Remote spreadsheet fetched through its CSV-export link.
    Sheet,
    /// PostgreSQL table.
    Database,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sheet => "spreadsheet",
            Self::Database => "database",
        }
    }
}

/// A dataset normalized by one of the source adapters.
///
/// The `DataFrame` is read-only downstream: the profiler and the report
/// generator only borrow it. `name` is the human-readable label used in
/// report file names.
#[derive(Debug)]
pub struct LoadedDataset {
    pub df: DataFrame,
    pub name: String,
    pub origin: SourceKind,
}

/// Profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name as loaded.
    pub name: String,
    /// Polars dtype as a string ("Int64", "Float64", "String", ...).
    pub dtype: String,
    /// Semantic type inferred from content: "numeric", "binary",
    /// "datetime", "categorical", "text", "unknown" or "other".
    pub inferred_type: String,
    pub unique_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    /// A small random sample of non-null values, stringified.
    pub sample_values: Vec<String>,
    /// Loose traits keyed by name (cardinality, distribution, ...).
    pub characteristics: HashMap<String, serde_json::Value>,
    /// Descriptive statistics, present for numeric columns.
    pub numeric: Option<NumericSummary>,
    /// Most frequent values, present for non-numeric columns.
    pub top_values: Vec<CategoryCount>,
}

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub q1: f64,
    pub q3: f64,
    pub skewness: f64,
    pub has_outliers: bool,
    pub histogram: Vec<HistogramBin>,
}

/// Histogram bin over a numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Frequency entry for a categorical value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Pearson correlation matrix over the numeric columns.
///
/// `values[i][j]` is the coefficient between `columns[i]` and
/// `columns[j]`; `None` where the pair is undefined (fewer than two
/// aligned observations, or zero variance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Dataset-level profile, the input to the report generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    /// (rows, columns)
    pub shape: (usize, usize),
    /// Estimated in-memory size in bytes.
    pub estimated_size_bytes: usize,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
    /// Count of columns per inferred type.
    pub type_counts: HashMap<String, usize>,
    pub column_profiles: Vec<ColumnProfile>,
    /// Present when the dataset has at least two numeric columns.
    pub correlation: Option<CorrelationMatrix>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_label() {
        assert_eq!(SourceKind::File.label(), "file");
        assert_eq!(SourceKind::Sheet.label(), "spreadsheet");
        assert_eq!(SourceKind::Database.label(), "database");
    }

    #[test]
    fn test_source_kind_serialization() {
        let json = serde_json::to_string(&SourceKind::Database).unwrap();
        assert_eq!(json, "\"database\"");
    }
}
