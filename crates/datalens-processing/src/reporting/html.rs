//! HTML rendering for profiling reports.
//!
//! The document is fully self-contained: inline CSS, no scripts, no
//! external assets. Distribution bars are plain divs sized as a
//! percentage of the largest bin.

use chrono::Local;
use polars::prelude::DataFrame;

use crate::profiler::display_value;
use crate::types::{ColumnProfile, CorrelationMatrix, DatasetProfile};

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 2rem auto; \
max-width: 1100px; color: #1c2733; background: #f7f9fb; }\n\
h1 { border-bottom: 2px solid #2a6fb0; padding-bottom: .3rem; }\n\
h2 { margin-top: 2rem; color: #2a6fb0; }\n\
table { border-collapse: collapse; margin: .5rem 0; width: 100%; background: #fff; }\n\
th, td { border: 1px solid #d6dee6; padding: .35rem .6rem; text-align: left; \
font-size: .9rem; }\n\
th { background: #eef3f8; }\n\
.meta { color: #5b6b7b; font-size: .9rem; }\n\
.card { background: #fff; border: 1px solid #d6dee6; border-radius: 6px; \
padding: 1rem 1.2rem; margin: 1rem 0; }\n\
.card h3 { margin: 0 0 .4rem 0; }\n\
.tag { display: inline-block; background: #e4edf5; border-radius: 4px; \
padding: .1rem .5rem; font-size: .8rem; margin-left: .5rem; }\n\
.bar-row { display: flex; align-items: center; gap: .6rem; font-size: .85rem; \
margin: .15rem 0; }\n\
.bar-label { width: 11rem; overflow: hidden; text-overflow: ellipsis; \
white-space: nowrap; }\n\
.bar { background: #4a90d9; height: .85rem; border-radius: 2px; }\n\
.bar-count { color: #5b6b7b; }\n\
.corr-strong { background: #c4dcf2; }\n\
.corr-moderate { background: #e0ecf7; }\n";

/// Render the full report document.
pub(crate) fn render_report(
    name: &str,
    df: &DataFrame,
    profile: &DatasetProfile,
    preview_rows: usize,
) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let title = escape(name);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title} — profiling report</title>\n"));
    out.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));

    out.push_str(&format!("<h1>{title}</h1>\n"));
    out.push_str(&format!(
        "<p class=\"meta\">Generated {}</p>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    overview_section(&mut out, profile);
    preview_section(&mut out, df, preview_rows);

    out.push_str("<h2>Columns</h2>\n");
    for column in &profile.column_profiles {
        column_card(&mut out, column);
    }

    if let Some(matrix) = &profile.correlation {
        correlation_section(&mut out, matrix);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn overview_section(out: &mut String, profile: &DatasetProfile) {
    out.push_str("<h2>Overview</h2>\n<table>\n");
    push_row(out, "Rows", &profile.shape.0.to_string());
    push_row(out, "Columns", &profile.shape.1.to_string());
    push_row(
        out,
        "Estimated size",
        &format_bytes(profile.estimated_size_bytes),
    );
    push_row(
        out,
        "Duplicate rows",
        &format!(
            "{} ({:.1}%)",
            profile.duplicate_count, profile.duplicate_percentage
        ),
    );

    let mut types: Vec<(&String, &usize)> = profile.type_counts.iter().collect();
    types.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    let composition = types
        .iter()
        .map(|(ty, count)| format!("{} {}", count, escape(ty)))
        .collect::<Vec<_>>()
        .join(", ");
    push_row(out, "Column types", &composition);
    out.push_str("</table>\n");
}

fn preview_section(out: &mut String, df: &DataFrame, preview_rows: usize) {
    out.push_str("<h2>Data preview</h2>\n<table>\n<tr>");
    for name in df.get_column_names() {
        out.push_str(&format!("<th>{}</th>", escape(name.as_str())));
    }
    out.push_str("</tr>\n");

    let rows = preview_rows.min(df.height());
    for i in 0..rows {
        out.push_str("<tr>");
        for col in df.get_columns() {
            let cell = col
                .get(i)
                .map(display_value)
                .unwrap_or_default();
            out.push_str(&format!("<td>{}</td>", escape(&cell)));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn column_card(out: &mut String, column: &ColumnProfile) {
    out.push_str("<div class=\"card\">\n");
    out.push_str(&format!(
        "<h3>{}<span class=\"tag\">{}</span><span class=\"tag\">{}</span></h3>\n",
        escape(&column.name),
        escape(&column.inferred_type),
        escape(&column.dtype)
    ));

    out.push_str("<table>\n");
    push_row(out, "Distinct", &column.unique_count.to_string());
    push_row(
        out,
        "Missing",
        &format!("{} ({:.1}%)", column.null_count, column.null_percentage),
    );

    if let Some(numeric) = &column.numeric {
        push_row(out, "Min", &format_number(numeric.min));
        push_row(out, "Q1", &format_number(numeric.q1));
        push_row(out, "Median", &format_number(numeric.median));
        push_row(out, "Mean", &format_number(numeric.mean));
        push_row(out, "Q3", &format_number(numeric.q3));
        push_row(out, "Max", &format_number(numeric.max));
        push_row(out, "Std dev", &format_number(numeric.std));
        push_row(out, "Skewness", &format_number(numeric.skewness));
        push_row(
            out,
            "Outliers",
            if numeric.has_outliers {
                "detected"
            } else {
                "none detected"
            },
        );
    }
    out.push_str("</table>\n");

    if let Some(numeric) = &column.numeric {
        if !numeric.histogram.is_empty() {
            let max_count = numeric
                .histogram
                .iter()
                .map(|bin| bin.count)
                .max()
                .unwrap_or(1)
                .max(1);
            out.push_str("<div>\n");
            for bin in &numeric.histogram {
                let width = bin.count as f64 / max_count as f64 * 100.0;
                out.push_str(&format!(
                    "<div class=\"bar-row\"><span class=\"bar-label\">{} – {}</span>\
<div class=\"bar\" style=\"width:{:.1}%\"></div>\
<span class=\"bar-count\">{}</span></div>\n",
                    format_number(bin.start),
                    format_number(bin.end),
                    width,
                    bin.count
                ));
            }
            out.push_str("</div>\n");
        }
    }

    if !column.top_values.is_empty() {
        let max_count = column
            .top_values
            .iter()
            .map(|entry| entry.count)
            .max()
            .unwrap_or(1)
            .max(1);
        out.push_str("<div>\n");
        for entry in &column.top_values {
            let width = entry.count as f64 / max_count as f64 * 100.0;
            out.push_str(&format!(
                "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
<div class=\"bar\" style=\"width:{:.1}%\"></div>\
<span class=\"bar-count\">{} ({:.1}%)</span></div>\n",
                escape(&entry.value),
                width,
                entry.count,
                entry.percentage
            ));
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
}

fn correlation_section(out: &mut String, matrix: &CorrelationMatrix) {
    out.push_str("<h2>Correlations (Pearson)</h2>\n<table>\n<tr><th></th>");
    for name in &matrix.columns {
        out.push_str(&format!("<th>{}</th>", escape(name)));
    }
    out.push_str("</tr>\n");

    for (i, name) in matrix.columns.iter().enumerate() {
        out.push_str(&format!("<tr><th>{}</th>", escape(name)));
        for value in &matrix.values[i] {
            match value {
                Some(r) => {
                    let class = if r.abs() >= 0.7 {
                        " class=\"corr-strong\""
                    } else if r.abs() >= 0.3 {
                        " class=\"corr-moderate\""
                    } else {
                        ""
                    };
                    out.push_str(&format!("<td{}>{:.2}</td>", class, r));
                }
                None => out.push_str("<td>—</td>"),
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn push_row(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", label, value));
}

fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Minimal HTML escaping for text nodes and attribute values.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
