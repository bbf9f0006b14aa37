//! Profiling, sampling and session-status commands.

use datalens_processing::{DataProfiler, DatasetProfile, LensError, ReportGenerator};

use crate::session::Session;

/// `analyze` — profile the active dataset and write the HTML report.
///
/// Serves the cached artifact path when one exists for the current
/// dataset; generation happens at most once per distinct load.
pub fn analyze(session: &mut Session) -> Result<(), LensError> {
    if let Some(path) = session.report_path() {
        println!(
            "Report already generated: {} (run 'reset' to regenerate)",
            path.display()
        );
        return Ok(());
    }

    let (name, profile, path) = {
        let dataset = session.require_dataset()?;
        let profile = DataProfiler::default()
            .profile(&dataset.df)
            .map_err(|e| LensError::Generation(e.to_string()))?;
        let generator = ReportGenerator::new(&session.reports_dir);
        let path = generator.write_report(&dataset.name, &dataset.df, &profile)?;
        (dataset.name.clone(), profile, path)
    };

    print_profile_summary(&name, &profile);
    println!("Report written to {}", path.display());
    session.set_report_path(path);
    Ok(())
}

/// `sample [rows]` — print the first rows of the active dataset.
pub fn sample(session: &mut Session, rows: usize) -> Result<(), LensError> {
    let dataset = session.require_dataset()?;
    super::load::print_sample(&dataset.df, rows);
    Ok(())
}

/// `reset` — drop the cached report path to force regeneration.
pub fn reset(session: &mut Session) -> Result<(), LensError> {
    session.clear_report_path();
    println!("Cleared cached report; the next 'analyze' will regenerate.");
    Ok(())
}

/// `status` — one-screen summary of the session state.
pub fn status(session: &mut Session) -> Result<(), LensError> {
    match session.source() {
        Some(kind) => println!("Source:     {}", kind.label()),
        None => println!("Source:     (none)"),
    }
    match session.dataset() {
        Some(dataset) => println!(
            "Dataset:    {} ({} rows x {} columns)",
            dataset.name,
            dataset.df.height(),
            dataset.df.width()
        ),
        None => println!("Dataset:    (none)"),
    }
    match session.connection() {
        Some(connection) => println!("Connection: {}", connection.label()),
        None => println!("Connection: (none)"),
    }
    match session.selected_schema() {
        Some(schema) => println!("Schema:     {schema}"),
        None => println!("Schema:     (none)"),
    }
    match session.report_path() {
        Some(path) => println!("Report:     {}", path.display()),
        None => println!("Report:     (none)"),
    }
    Ok(())
}

fn print_profile_summary(name: &str, profile: &DatasetProfile) {
    println!();
    println!("{}", "=".repeat(70));
    println!(
        "PROFILE: {} ({} rows x {} columns, {} duplicate rows)",
        name, profile.shape.0, profile.shape.1, profile.duplicate_count
    );
    println!("{}", "-".repeat(70));
    println!(
        "{:<24} {:<12} {:<10} {:<10}",
        "Column", "Type", "Missing %", "Unique"
    );
    println!("{}", "-".repeat(70));
    for column in &profile.column_profiles {
        println!(
            "{:<24} {:<12} {:<10.1} {:<10}",
            truncate_str(&column.name, 23),
            column.inferred_type,
            column.null_percentage,
            column.unique_count
        );
    }
    println!("{}", "=".repeat(70));
}

/// Truncate a string to max length with ellipsis.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use datalens_processing::{LoadedDataset, SourceKind};
    use polars::prelude::*;
    use std::path::PathBuf;

    fn session_with_dataset(dir: &std::path::Path) -> Session {
        let mut session = Session::new(dir.to_path_buf());
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1i64, 2, 3]).into(),
            Series::new("b".into(), &[2i64, 4, 6]).into(),
        ])
        .unwrap();
        session.set_dataset(LoadedDataset {
            df,
            name: "numbers".to_string(),
            origin: SourceKind::File,
        });
        session
    }

    fn report_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[test]
    fn test_analyze_writes_once_until_reset() {
        let dir = std::env::temp_dir().join(format!(
            "datalens-analyze-test-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let mut session = session_with_dataset(&dir);

        analyze(&mut session).unwrap();
        assert_eq!(report_count(&dir), 1);
        let first = session.report_path().unwrap().to_path_buf();

        // Second analyze is a cache hit: no new file
        analyze(&mut session).unwrap();
        assert_eq!(report_count(&dir), 1);
        assert_eq!(session.report_path().unwrap(), first.as_path());

        // Reset forces a fresh artifact
        reset(&mut session).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        analyze(&mut session).unwrap();
        assert_eq!(report_count(&dir), 2);
        assert_ne!(session.report_path().unwrap(), first.as_path());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_analyze_without_dataset_fails() {
        let mut session = Session::new(PathBuf::from("./reports"));
        let error = analyze(&mut session).unwrap_err();
        assert_eq!(error.error_code(), "NO_DATA_LOADED");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a_very_long_column_name", 10), "a_very_...");
    }
}
