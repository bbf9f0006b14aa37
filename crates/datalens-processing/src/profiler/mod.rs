//! Dataset profiling.
//!
//! The profiler walks every column of a dataset and produces a
//! [`DatasetProfile`]: semantic type per column, descriptive statistics,
//! duplicate and missing-value counts, and the Pearson correlation
//! matrix over the numeric columns. The profile is the sole input the
//! report generator needs besides the raw frame.

mod correlation;
mod statistics;
mod type_inference;

use anyhow::Result;
use polars::prelude::*;
use rand::prelude::*;
use std::collections::HashMap;

use crate::config::ProfileConfig;
use crate::types::{ColumnProfile, DatasetProfile};

pub(crate) use statistics::display_value;

/// Profiles datasets column by column.
#[derive(Default)]
pub struct DataProfiler {
    config: ProfileConfig,
}

impl DataProfiler {
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    /// Profile an entire dataset.
    pub fn profile(&self, df: &DataFrame) -> Result<DatasetProfile> {
        let mut column_profiles = Vec::with_capacity(df.width());
        for col_name in df.get_column_names() {
            column_profiles.push(self.profile_column(df, col_name.as_str())?);
        }

        let duplicate_count = if df.height() > 0 {
            df.height()
                - df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?
                    .height()
        } else {
            0
        };
        let duplicate_percentage = if df.height() > 0 {
            (duplicate_count as f64 / df.height() as f64) * 100.0
        } else {
            0.0
        };

        let mut type_counts: HashMap<String, usize> = HashMap::new();
        for profile in &column_profiles {
            *type_counts.entry(profile.inferred_type.clone()).or_insert(0) += 1;
        }

        let correlation = correlation::pearson_matrix(df)?;

        Ok(DatasetProfile {
            shape: (df.height(), df.width()),
            estimated_size_bytes: df.estimated_size(),
            duplicate_count,
            duplicate_percentage,
            type_counts,
            column_profiles,
            correlation,
        })
    }

    fn profile_column(&self, df: &DataFrame, col_name: &str) -> Result<ColumnProfile> {
        let col = df.column(col_name)?;
        let series = col.as_materialized_series();
        let dtype = format!("{:?}", series.dtype());
        let unique_count = series.n_unique()?;
        let null_count = series.null_count();
        let null_percentage = if df.height() > 0 {
            (null_count as f64 / df.height() as f64) * 100.0
        } else {
            0.0
        };

        let sample_values = self.sample_values(series)?;
        let inferred_type = type_inference::infer_column_type(series, &sample_values)?;
        let characteristics =
            statistics::extract_characteristics(series, &inferred_type, unique_count)?;

        let numeric = if inferred_type == "numeric" {
            statistics::numeric_summary(series, self.config.histogram_bins)?
        } else {
            None
        };
        let top_values = if numeric.is_none() && inferred_type != "unknown" {
            statistics::top_value_counts(series, self.config.top_values)?
        } else {
            Vec::new()
        };

        Ok(ColumnProfile {
            name: col_name.to_string(),
            dtype,
            inferred_type,
            unique_count,
            null_count,
            null_percentage,
            sample_values,
            characteristics,
            numeric,
            top_values,
        })
    }

    /// A deterministic random sample of non-null values, stringified.
    fn sample_values(&self, series: &Series) -> Result<Vec<String>> {
        let non_null = series.drop_nulls();
        if non_null.is_empty() {
            return Ok(Vec::new());
        }

        let sample_size = self.config.sample_values.min(non_null.len());
        let mut rng = StdRng::seed_from_u64(42);
        let indices: Vec<usize> = (0..non_null.len()).collect();
        let sampled: Vec<usize> = indices
            .choose_multiple(&mut rng, sample_size)
            .copied()
            .collect();

        let mut values = Vec::with_capacity(sample_size);
        for idx in sampled {
            if let Ok(value) = non_null.get(idx) {
                values.push(display_value(value));
            }
        }
        Ok(values)
    }
}
