//! End-to-end tests: load a fixture, profile it, write a report.

use std::path::PathBuf;

use datalens_processing::sources::{export_url_from_share_link, load_csv_file};
use datalens_processing::{DataProfiler, ReportGenerator, SourceKind};
use pretty_assertions::assert_eq;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

// ============================================================================
// CSV loading
// ============================================================================

#[test]
fn test_tiny_csv_columns_and_rows_in_order() {
    let dataset = load_csv_file(&fixtures_path().join("tiny.csv")).unwrap();

    let names: Vec<String> = dataset
        .df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(dataset.df.shape(), (3, 2));
    assert_eq!(dataset.name, "tiny");
    assert_eq!(dataset.origin, SourceKind::File);

    let mut rows = Vec::new();
    let a = dataset.df.column("a").unwrap();
    let b = dataset.df.column("b").unwrap();
    for i in 0..dataset.df.height() {
        rows.push((
            a.get(i).unwrap().try_extract::<i64>().unwrap(),
            b.get(i).unwrap().try_extract::<i64>().unwrap(),
        ));
    }
    assert_eq!(rows, vec![(1, 2), (3, 4), (5, 6)]);
}

#[test]
fn test_products_fixture_shape() {
    let dataset = load_csv_file(&fixtures_path().join("products.csv")).unwrap();
    assert_eq!(dataset.df.shape(), (10, 6));
}

// ============================================================================
// Profiling
// ============================================================================

#[test]
fn test_profile_of_products_fixture() {
    let dataset = load_csv_file(&fixtures_path().join("products.csv")).unwrap();
    let profile = DataProfiler::default().profile(&dataset.df).unwrap();

    assert_eq!(profile.shape, (10, 6));
    assert_eq!(profile.duplicate_count, 1);

    let price = profile
        .column_profiles
        .iter()
        .find(|c| c.name == "price")
        .unwrap();
    assert_eq!(price.inferred_type, "numeric");
    let summary = price.numeric.as_ref().unwrap();
    assert_eq!(summary.min, 4.5);
    assert_eq!(summary.max, 31.4);

    let quantity = profile
        .column_profiles
        .iter()
        .find(|c| c.name == "quantity")
        .unwrap();
    assert_eq!(quantity.null_count, 2);

    let category = profile
        .column_profiles
        .iter()
        .find(|c| c.name == "category")
        .unwrap();
    assert_eq!(category.inferred_type, "categorical");
    assert_eq!(category.top_values[0].value, "tools");

    let added_on = profile
        .column_profiles
        .iter()
        .find(|c| c.name == "added_on")
        .unwrap();
    assert_eq!(added_on.inferred_type, "datetime");

    // id, price and quantity are numeric, so correlations exist
    let correlation = profile.correlation.as_ref().unwrap();
    assert!(correlation.columns.contains(&"price".to_string()));
}

// ============================================================================
// Report generation
// ============================================================================

#[test]
fn test_report_roundtrip_from_fixture() {
    let dataset = load_csv_file(&fixtures_path().join("products.csv")).unwrap();
    let profile = DataProfiler::default().profile(&dataset.df).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let generator = ReportGenerator::new(dir.path());
    let path = generator
        .write_report(&dataset.name, &dataset.df, &profile)
        .unwrap();

    assert!(path.exists());
    let file_name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("products_"));
    assert!(file_name.ends_with(".html"));

    let content = std::fs::read_to_string(&path).unwrap();
    for column in ["id", "name", "category", "price", "quantity", "added_on"] {
        assert!(content.contains(column), "report misses column {column}");
    }
    assert!(content.contains("Correlations"));
    // Leading fixture row appears in the preview
    assert!(content.contains("Widget"));
}

// ============================================================================
// Share-link rewriting
// ============================================================================

#[test]
fn test_share_link_rewrite() {
    let url = export_url_from_share_link(
        "https://docs.google.com/spreadsheets/d/1XyZ/edit#gid=42",
    )
    .unwrap();
    assert_eq!(
        url,
        "https://docs.google.com/spreadsheets/d/1XyZ/export?format=csv&gid=42"
    );
}

#[test]
fn test_share_link_without_pattern_is_rejected() {
    let error =
        export_url_from_share_link("https://docs.google.com/spreadsheets/d/1XyZ/preview")
            .unwrap_err();
    assert_eq!(error.error_code(), "UNSUPPORTED_SHARE_LINK");
}
