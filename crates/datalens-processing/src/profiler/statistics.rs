//! Statistical analysis functions for column profiling.

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::*;

use crate::types::{CategoryCount, HistogramBin, NumericSummary};

/// Extract loose characteristics from a column (cardinality,
/// distribution shape, most frequent value).
pub(crate) fn extract_characteristics(
    series: &Series,
    inferred_type: &str,
    unique_count: usize,
) -> Result<HashMap<String, serde_json::Value>> {
    let mut characteristics = HashMap::new();

    let cardinality = if unique_count < 10 {
        "low"
    } else if unique_count < 50 {
        "medium"
    } else {
        "high"
    };
    characteristics.insert("cardinality".to_string(), serde_json::json!(cardinality));

    if inferred_type == "numeric" {
        if let Some(float_series) = numeric_values(series)? {
            let skewness = calculate_skewness(&float_series)?;
            let distribution = if skewness.abs() < 1.0 {
                "normal"
            } else {
                "skewed"
            };
            characteristics.insert("distribution".to_string(), serde_json::json!(distribution));
        }
    } else {
        let top = top_value_counts(series, 1)?;
        if let Some(entry) = top.first() {
            characteristics.insert(
                "most_frequent".to_string(),
                serde_json::json!(entry.value.clone()),
            );
        }
    }

    Ok(characteristics)
}

/// Descriptive statistics for a numeric column, or `None` when the
/// column has no usable numeric values.
pub(crate) fn numeric_summary(series: &Series, bins: usize) -> Result<Option<NumericSummary>> {
    let float_series = match numeric_values(series)? {
        Some(s) => s,
        None => return Ok(None),
    };

    let ca = float_series.f64()?;
    let min = ca.min().unwrap_or(0.0);
    let max = ca.max().unwrap_or(0.0);
    let mean = float_series.mean().unwrap_or(0.0);
    let median = float_series.median().unwrap_or(0.0);
    let std = calculate_std(&float_series)?;
    let skewness = calculate_skewness(&float_series)?;
    let (q1, q3) = quartiles(&float_series)?;
    let has_outliers = detect_outliers(&float_series)?;

    let values: Vec<f64> = ca.into_iter().flatten().collect();
    let histogram = histogram(&values, bins);

    Ok(Some(NumericSummary {
        min,
        max,
        mean,
        median,
        std,
        q1,
        q3,
        skewness,
        has_outliers,
        histogram,
    }))
}

/// Cast a column to Float64, dropping nulls and unparseable values.
/// Returns `None` when nothing survives.
fn numeric_values(series: &Series) -> Result<Option<Series>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(None);
    }
    let float_series = non_null.cast(&DataType::Float64)?.drop_nulls();
    if float_series.is_empty() {
        return Ok(None);
    }
    Ok(Some(float_series))
}

/// Most frequent values with counts and percentages, descending.
pub(crate) fn top_value_counts(series: &Series, k: usize) -> Result<Vec<CategoryCount>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() || k == 0 {
        return Ok(Vec::new());
    }

    let counts_df = non_null.value_counts(true, false, "count".into(), false)?;
    let values_col = counts_df.column(non_null.name().as_str())?;
    let counts_col = counts_df.column("count")?;
    let total = non_null.len() as f64;

    let take = k.min(counts_df.height());
    let mut out = Vec::with_capacity(take);
    for i in 0..take {
        let value = display_value(values_col.get(i)?);
        let count = counts_col.get(i)?.try_extract::<u64>().unwrap_or(0) as usize;
        out.push(CategoryCount {
            value,
            count,
            percentage: count as f64 / total * 100.0,
        });
    }
    Ok(out)
}

/// Stringify a cell without the surrounding quotes Polars adds to
/// string values.
pub(crate) fn display_value(value: AnyValue) -> String {
    let rendered = format!("{}", value);
    rendered.trim_matches('"').to_string()
}

/// Calculate the sample standard deviation of a series.
pub(crate) fn calculate_std(series: &Series) -> Result<f64> {
    let mean = series.mean().unwrap_or(0.0);
    let n = series.len() as f64;

    if n <= 1.0 {
        return Ok(0.0);
    }

    let float_series = series.f64()?;
    let variance: f64 = float_series
        .into_iter()
        .filter_map(|v| v.map(|val| (val - mean).powi(2)))
        .sum::<f64>()
        / (n - 1.0);

    Ok(variance.sqrt())
}

/// Calculate the skewness of a series.
pub(crate) fn calculate_skewness(series: &Series) -> Result<f64> {
    let mean = series.mean().unwrap_or(0.0);
    let std = calculate_std(series)?;

    if std == 0.0 {
        return Ok(0.0);
    }

    let n = series.len() as f64;
    let float_series = series.f64()?;

    let skew_sum: f64 = float_series
        .into_iter()
        .filter_map(|v| v.map(|val| ((val - mean) / std).powi(3)))
        .sum();

    Ok(skew_sum / n)
}

/// First and third quartiles, by sorted position.
pub(crate) fn quartiles(series: &Series) -> Result<(f64, f64)> {
    let sorted = series.sort(SortOptions::default())?;
    let n = sorted.len();
    if n == 0 {
        return Ok((0.0, 0.0));
    }

    let q1_idx = (n as f64 * 0.25) as usize;
    let q3_idx = ((n as f64 * 0.75) as usize).min(n - 1);

    let q1 = sorted.get(q1_idx)?.try_extract::<f64>().unwrap_or(0.0);
    let q3 = sorted.get(q3_idx)?.try_extract::<f64>().unwrap_or(0.0);
    Ok((q1, q3))
}

/// Detect whether a series has outliers using the IQR method. More
/// than 5% of values outside 1.5*IQR counts as an outlier signal.
pub(crate) fn detect_outliers(series: &Series) -> Result<bool> {
    let n = series.len();
    if n < 4 {
        return Ok(false);
    }

    let (q1, q3) = quartiles(series)?;
    let iqr = q3 - q1;
    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let float_series = series.f64()?;
    let outlier_count = float_series
        .into_iter()
        .flatten()
        .filter(|val| *val < lower_bound || *val > upper_bound)
        .count();

    Ok(outlier_count > n / 20)
}

/// Fixed-width histogram over the given values.
pub(crate) fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for value in values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== calculate_std tests ====================

    #[test]
    fn test_calculate_std_basic() {
        // Values 1..5: mean 3, sample variance 2.5, std ~1.58
        let series = Series::new("val".into(), &[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let std = calculate_std(&series).unwrap();
        assert!((std - 1.58).abs() < 0.1);
    }

    #[test]
    fn test_calculate_std_single_value() {
        let series = Series::new("val".into(), &[5.0f64]);
        assert_eq!(calculate_std(&series).unwrap(), 0.0);
    }

    #[test]
    fn test_calculate_std_identical_values() {
        let series = Series::new("val".into(), &[5.0f64, 5.0, 5.0, 5.0]);
        assert_eq!(calculate_std(&series).unwrap(), 0.0);
    }

    // ==================== calculate_skewness tests ====================

    #[test]
    fn test_skewness_symmetric() {
        let series = Series::new("val".into(), &[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        assert!(calculate_skewness(&series).unwrap().abs() < 0.1);
    }

    #[test]
    fn test_skewness_positive() {
        let series = Series::new("val".into(), &[1.0f64, 1.0, 1.0, 1.0, 10.0]);
        assert!(calculate_skewness(&series).unwrap() > 0.0);
    }

    #[test]
    fn test_skewness_zero_std() {
        let series = Series::new("val".into(), &[5.0f64, 5.0, 5.0]);
        assert_eq!(calculate_skewness(&series).unwrap(), 0.0);
    }

    // ==================== quartiles / outliers ====================

    #[test]
    fn test_quartiles_ordering() {
        let series = Series::new(
            "val".into(),
            &[9.0f64, 1.0, 5.0, 3.0, 7.0, 2.0, 8.0, 4.0, 6.0],
        );
        let (q1, q3) = quartiles(&series).unwrap();
        assert!(q1 < q3);
        assert!(q1 >= 1.0 && q3 <= 9.0);
    }

    #[test]
    fn test_detect_outliers_with_outlier() {
        let series = Series::new(
            "val".into(),
            &[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0],
        );
        assert!(detect_outliers(&series).unwrap());
    }

    #[test]
    fn test_detect_outliers_none() {
        let series = Series::new(
            "val".into(),
            &[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        );
        assert!(!detect_outliers(&series).unwrap());
    }

    #[test]
    fn test_detect_outliers_small_sample() {
        let series = Series::new("val".into(), &[1.0f64, 2.0, 100.0]);
        assert!(!detect_outliers(&series).unwrap());
    }

    // ==================== histogram ====================

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let values: Vec<f64> = (1..=100).map(|v| v as f64).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
    }

    #[test]
    fn test_histogram_constant_values() {
        let bins = histogram(&[4.0, 4.0, 4.0], 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], 10).is_empty());
    }

    // ==================== numeric_summary ====================

    #[test]
    fn test_numeric_summary_basic() {
        let series = Series::new("price".into(), &[10.0f64, 20.0, 30.0, 40.0, 50.0]);
        let summary = numeric_summary(&series, 5).unwrap().unwrap();
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 50.0);
        assert!((summary.mean - 30.0).abs() < 0.01);
        assert!((summary.median - 30.0).abs() < 0.01);
        assert!(!summary.has_outliers);
        assert!(!summary.histogram.is_empty());
    }

    #[test]
    fn test_numeric_summary_numeric_strings() {
        let series = Series::new("price".into(), &["10", "20", "30"]);
        let summary = numeric_summary(&series, 5).unwrap().unwrap();
        assert!((summary.mean - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_numeric_summary_empty() {
        let series: Series = Series::new("val".into(), Vec::<f64>::new());
        assert!(numeric_summary(&series, 5).unwrap().is_none());
    }

    // ==================== top values / characteristics ====================

    #[test]
    fn test_top_value_counts_order() {
        let series = Series::new("cat".into(), &["a", "b", "a", "b", "a", "c"]);
        let top = top_value_counts(&series, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, "a");
        assert_eq!(top[0].count, 3);
        assert!((top[0].percentage - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_characteristics_numeric() {
        let series = Series::new("n".into(), &[1.0f64, 2.0, 3.0, 4.0, 5.0]);
        let chars = extract_characteristics(&series, "numeric", 5).unwrap();
        assert_eq!(chars["cardinality"], "low");
        assert_eq!(chars["distribution"], "normal");
    }

    #[test]
    fn test_characteristics_categorical() {
        let series = Series::new("cat".into(), &["x", "y", "x"]);
        let chars = extract_characteristics(&series, "categorical", 2).unwrap();
        assert_eq!(chars["most_frequent"], "x");
    }

    #[test]
    fn test_characteristics_cardinality_buckets() {
        let series = Series::new("n".into(), &[1.0f64, 2.0]);
        assert_eq!(
            extract_characteristics(&series, "numeric", 25).unwrap()["cardinality"],
            "medium"
        );
        assert_eq!(
            extract_characteristics(&series, "numeric", 100).unwrap()["cardinality"],
            "high"
        );
    }
}
