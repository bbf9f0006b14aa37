//! CSV file import.

use std::io::Cursor;
use std::path::Path;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{LensError, Result};
use crate::types::{LoadedDataset, SourceKind};

/// Rows sampled for CSV schema inference.
const INFER_SCHEMA_ROWS: usize = 1000;

/// Load a CSV file from disk into a dataset.
///
/// Parsing is attempted in layers: a strict quoted read first, then a
/// read without quote handling, then a pass over pre-normalized text.
/// The first layer to succeed wins; if every layer fails the error from
/// the strict read is the one reported.
pub fn load_csv_file(path: &Path) -> Result<LoadedDataset> {
    if !path.exists() {
        return Err(LensError::Parse {
            source_name: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();

    let df = read_with_fallbacks(path)?;
    info!(
        "loaded {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );

    Ok(LoadedDataset {
        df,
        name,
        origin: SourceKind::File,
    })
}

fn read_with_fallbacks(path: &Path) -> Result<DataFrame> {
    let strict_error = match read_quoted(path) {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("strict CSV read failed: {}", e);
            e
        }
    };

    match read_plain(path) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("plain CSV read failed: {}", e),
    }

    if let Ok(content) = std::fs::read_to_string(path) {
        let cleaned = normalize_csv_text(&content);
        if let Ok(df) = read_csv_text(&cleaned) {
            return Ok(df);
        }
    }

    Err(LensError::Parse {
        source_name: path.display().to_string(),
        reason: strict_error.to_string(),
    })
}

fn read_quoted(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

fn read_plain(path: &Path) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Parse CSV text held in memory. Shared with the spreadsheet adapter.
pub(crate) fn read_csv_text(text: &str) -> PolarsResult<DataFrame> {
    let cursor = Cursor::new(text.as_bytes().to_vec());
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(cursor)
        .finish()
}

/// Collapse doubled quotes and drop blank lines before a retry parse.
fn normalize_csv_text(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_load_preserves_header_and_row_order() {
        let file = write_temp_csv("a,b\n1,2\n3,4\n5,6\n");
        let dataset = load_csv_file(file.path()).unwrap();

        let names: Vec<String> = dataset
            .df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(dataset.df.shape(), (3, 2));

        let a = dataset.df.column("a").unwrap();
        let values: Vec<i64> = (0..a.len())
            .map(|i| a.get(i).unwrap().try_extract::<i64>().unwrap())
            .collect();
        assert_eq!(values, vec![1, 3, 5]);
        assert_eq!(dataset.origin, SourceKind::File);
    }

    #[test]
    fn test_name_comes_from_file_stem() {
        let file = write_temp_csv("x\n1\n");
        let dataset = load_csv_file(file.path()).unwrap();
        let stem = file
            .path()
            .file_stem()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert_eq!(dataset.name, stem);
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let error = load_csv_file(Path::new("/nonexistent/nowhere.csv")).unwrap_err();
        assert_eq!(error.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_ragged_rows_are_parse_error() {
        let file = write_temp_csv("a,b\n1,2\n3,4,5,6\n");
        let error = load_csv_file(file.path()).unwrap_err();
        assert_eq!(error.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_blank_lines_are_tolerated() {
        let file = write_temp_csv("a,b\n1,2\n\n3,4\n");
        let dataset = load_csv_file(file.path()).unwrap();
        assert_eq!(dataset.df.width(), 2);
    }

    #[test]
    fn test_normalize_csv_text() {
        let cleaned = normalize_csv_text("a,b\n\n1,\"\"x\"\"\n");
        assert_eq!(cleaned, "a,b\n1,\"x\"");
    }
}
