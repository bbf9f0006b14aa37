//! Writes profiling reports to disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use polars::prelude::DataFrame;
use tracing::info;

use crate::config::ProfileConfig;
use crate::error::{LensError, Result};
use crate::profiler::DataProfiler;
use crate::reporting::html;
use crate::types::{DatasetProfile, LoadedDataset};

/// Generates HTML report artifacts under an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    config: ProfileConfig,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            config: ProfileConfig::default(),
        }
    }

    pub fn with_config(output_dir: impl Into<PathBuf>, config: ProfileConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
        }
    }

    /// Profile a dataset and write its report in one step.
    pub fn generate(&self, dataset: &LoadedDataset) -> Result<PathBuf> {
        let profile = DataProfiler::new(self.config.clone())
            .profile(&dataset.df)
            .map_err(|e| LensError::Generation(e.to_string()))?;
        self.write_report(&dataset.name, &dataset.df, &profile)
    }

    /// Render a precomputed profile and write the artifact.
    ///
    /// The file is named `<name>_<YYYY-MM-DD_HH-MM-SS>.html`; the output
    /// directory is created if absent. Every failure maps to
    /// [`LensError::Generation`].
    pub fn write_report(
        &self,
        name: &str,
        df: &DataFrame,
        profile: &DatasetProfile,
    ) -> Result<PathBuf> {
        let document = html::render_report(name, df, profile, self.config.preview_rows);

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            LensError::Generation(format!(
                "cannot create {}: {}",
                self.output_dir.display(),
                e
            ))
        })?;

        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        let file_name = format!("{}_{}.html", sanitize_file_stem(name), timestamp);
        let path = self.output_dir.join(file_name);

        let mut file =
            File::create(&path).map_err(|e| LensError::Generation(e.to_string()))?;
        file.write_all(document.as_bytes())
            .map_err(|e| LensError::Generation(e.to_string()))?;

        info!("Report saved: {}", path.display());
        Ok(path)
    }
}

/// Restrict a dataset name to filesystem-safe characters.
fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "dataset".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample_dataset() -> LoadedDataset {
        let df = DataFrame::new(vec![
            Series::new("price".into(), &[9.99f64, 19.99, 4.5]).into(),
            Series::new("category".into(), &["tools", "toys", "tools"]).into(),
        ])
        .unwrap();
        LoadedDataset {
            df,
            name: "products".to_string(),
            origin: crate::types::SourceKind::File,
        }
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("products"), "products");
        assert_eq!(sanitize_file_stem("my table!"), "my_table_");
        assert_eq!(sanitize_file_stem(""), "dataset");
    }

    #[test]
    fn test_generate_writes_timestamped_html() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let dataset = sample_dataset();

        let path = generator.generate(&dataset).unwrap();
        assert!(path.exists());

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("products_"));
        assert!(file_name.ends_with(".html"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<!DOCTYPE html>"));
        assert!(content.contains("price"));
        assert!(content.contains("category"));
    }

    #[test]
    fn test_generate_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports/nested");
        let generator = ReportGenerator::new(&nested);

        let path = generator.generate(&sample_dataset()).unwrap();
        assert!(nested.exists());
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn test_two_generations_yield_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(dir.path());
        let dataset = sample_dataset();

        let first = generator.generate(&dataset).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = generator.generate(&dataset).unwrap();
        assert_ne!(first, second);
    }
}
