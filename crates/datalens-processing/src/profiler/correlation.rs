//! Pearson correlation over numeric column pairs.

use anyhow::Result;
use polars::prelude::*;

use crate::types::CorrelationMatrix;
use crate::utils::is_numeric_dtype;

/// Build the Pearson correlation matrix over the numeric columns of a
/// dataset. Returns `None` when fewer than two numeric columns exist.
///
/// Each pair is computed over the rows where both values are present;
/// pairs with fewer than two such rows or zero variance are `None` in
/// the matrix.
pub(crate) fn pearson_matrix(df: &DataFrame) -> Result<Option<CorrelationMatrix>> {
    let mut columns = Vec::new();
    let mut series_values: Vec<Vec<Option<f64>>> = Vec::new();

    for col in df.get_columns() {
        if !is_numeric_dtype(col.dtype()) {
            continue;
        }
        let float_series = col.as_materialized_series().cast(&DataType::Float64)?;
        let ca = float_series.f64()?;
        columns.push(col.name().to_string());
        series_values.push(ca.into_iter().collect());
    }

    if columns.len() < 2 {
        return Ok(None);
    }

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&series_values[i], &series_values[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(Some(CorrelationMatrix { columns, values }))
}

/// Pearson coefficient over the positions where both vectors have a
/// value. `None` when undefined.
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
