//! Semantic type inference for columns.

use anyhow::Result;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

use crate::utils::{
    is_boolean_string, is_datetime_dtype, is_error_marker, is_numeric_dtype, is_numeric_string,
};

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

/// Fraction of samples that must look like dates for a string column to
/// count as datetime.
const DATE_SAMPLE_THRESHOLD: f64 = 0.8;

/// Fraction of samples that must parse as numbers for a string column
/// to count as numeric.
const NUMERIC_SAMPLE_THRESHOLD: f64 = 0.7;

/// Infer the semantic type of a column from its dtype and a sample of
/// its stringified values.
///
/// Returns one of "binary", "datetime", "numeric", "text",
/// "categorical", "unknown" (all null) or "other".
pub(crate) fn infer_column_type(series: &Series, sample_values: &[String]) -> Result<String> {
    if series.null_count() == series.len() {
        return Ok("unknown".to_string());
    }

    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok("unknown".to_string());
    }

    if series.dtype() == &DataType::Boolean || is_boolean_samples(sample_values) {
        return Ok("binary".to_string());
    }

    if is_datetime_dtype(series.dtype()) || is_date_samples(sample_values) {
        return Ok("datetime".to_string());
    }

    if is_numeric_dtype(series.dtype()) || is_numeric_samples(sample_values) {
        return Ok("numeric".to_string());
    }

    if series.dtype() == &DataType::String {
        let unique_ratio = non_null.n_unique()? as f64 / non_null.len() as f64;
        let str_series = non_null.str()?;
        let avg_length: f64 = str_series
            .into_iter()
            .filter_map(|v| v.map(|s| s.len()))
            .sum::<usize>() as f64
            / non_null.len() as f64;

        // Free text if highly unique and long, categorical otherwise.
        if unique_ratio > 0.7 && avg_length > 30.0 {
            return Ok("text".to_string());
        }
        return Ok("categorical".to_string());
    }

    Ok("other".to_string())
}

fn is_boolean_samples(sample_values: &[String]) -> bool {
    !sample_values.is_empty()
        && sample_values
            .iter()
            .all(|sample| is_boolean_string(sample.trim()))
}

fn is_date_samples(sample_values: &[String]) -> bool {
    sample_fraction(sample_values, |sample| {
        DATE_PATTERNS.iter().any(|pattern| pattern.is_match(sample))
    }) >= DATE_SAMPLE_THRESHOLD
}

fn is_numeric_samples(sample_values: &[String]) -> bool {
    sample_fraction(sample_values, is_numeric_string) >= NUMERIC_SAMPLE_THRESHOLD
}

/// Fraction of usable samples matching a predicate; error markers and
/// empty strings are skipped. Returns 0.0 when nothing is usable.
fn sample_fraction(sample_values: &[String], predicate: impl Fn(&str) -> bool) -> f64 {
    let mut matched = 0usize;
    let mut total = 0usize;
    for sample in sample_values {
        let trimmed = sample.trim();
        if trimmed.is_empty() || is_error_marker(trimmed) {
            continue;
        }
        total += 1;
        if predicate(trimmed) {
            matched += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64
}
