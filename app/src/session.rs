//! Per-session state and cache invalidation.
//!
//! All interactive state lives in an explicit [`Session`] passed to
//! every command handler; nothing is global. Cached fields are cleared
//! through a single rule table applied by [`Session::invalidate`]:
//!
//! | event             | cleared fields |
//! |-------------------|----------------|
//! | source changed    | report path    |
//! | schema changed    | table list     |
//! | dataset replaced  | report path    |
//!
//! The report invariant follows from the table: a report is regenerated
//! if and only if no cached report path exists for the currently loaded
//! dataset, because every path that changes the dataset also clears the
//! cached report path.

use std::path::{Path, PathBuf};

use datalens_processing::sources::DatabaseSource;
use datalens_processing::{LensError, LoadedDataset, SourceKind};
use tracing::debug;

/// State transitions that invalidate cached fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SourceChanged,
    SchemaChanged,
    DatasetReplaced,
}

/// Everything one interactive session remembers between commands.
pub struct Session {
    /// Directory where report artifacts are written.
    pub reports_dir: PathBuf,
    source: Option<SourceKind>,
    dataset: Option<LoadedDataset>,
    connection: Option<DatabaseSource>,
    schemas: Option<Vec<String>>,
    selected_schema: Option<String>,
    tables: Option<Vec<String>>,
    report_path: Option<PathBuf>,
}

impl Session {
    pub fn new(reports_dir: PathBuf) -> Self {
        Self {
            reports_dir,
            source: None,
            dataset: None,
            connection: None,
            schemas: None,
            selected_schema: None,
            tables: None,
            report_path: None,
        }
    }

    /// Apply the invalidation rule table for one event.
    pub fn invalidate(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SourceChanged => {
                debug!("source changed; clearing cached report path");
                self.report_path = None;
            }
            SessionEvent::SchemaChanged => {
                debug!("schema changed; clearing cached table list");
                self.tables = None;
            }
            SessionEvent::DatasetReplaced => {
                debug!("dataset replaced; clearing cached report path");
                self.report_path = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Source kind
    // ------------------------------------------------------------------

    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    /// Record the active source kind, invalidating on change.
    pub fn set_source(&mut self, kind: SourceKind) {
        if self.source != Some(kind) {
            self.source = Some(kind);
            self.invalidate(SessionEvent::SourceChanged);
        }
    }

    // ------------------------------------------------------------------
    // Dataset
    // ------------------------------------------------------------------

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn require_dataset(&self) -> Result<&LoadedDataset, LensError> {
        self.dataset.as_ref().ok_or(LensError::NoDataLoaded)
    }

    /// Install a freshly loaded dataset. Updates the source kind and
    /// clears the cached report path.
    pub fn set_dataset(&mut self, dataset: LoadedDataset) {
        self.set_source(dataset.origin);
        self.invalidate(SessionEvent::DatasetReplaced);
        self.dataset = Some(dataset);
    }

    // ------------------------------------------------------------------
    // Database connection and catalog caches
    // ------------------------------------------------------------------

    pub fn connection(&self) -> Option<&DatabaseSource> {
        self.connection.as_ref()
    }

    pub fn require_connection(&self) -> Result<&DatabaseSource, LensError> {
        self.connection.as_ref().ok_or(LensError::NoConnection)
    }

    /// Install a new connection handle, returning the replaced one so
    /// the caller can close it. Schema-derived caches reset with the
    /// connection.
    pub fn replace_connection(&mut self, connection: DatabaseSource) -> Option<DatabaseSource> {
        self.schemas = None;
        self.selected_schema = None;
        self.tables = None;
        self.connection.replace(connection)
    }

    pub fn schemas(&self) -> Option<&Vec<String>> {
        self.schemas.as_ref()
    }

    pub fn set_schemas(&mut self, schemas: Vec<String>) {
        self.schemas = Some(schemas);
    }

    pub fn selected_schema(&self) -> Option<&String> {
        self.selected_schema.as_ref()
    }

    /// Select a schema, invalidating the table list on change.
    pub fn select_schema(&mut self, schema: String) {
        if self.selected_schema.as_deref() != Some(schema.as_str()) {
            self.selected_schema = Some(schema);
            self.invalidate(SessionEvent::SchemaChanged);
        }
    }

    pub fn tables(&self) -> Option<&Vec<String>> {
        self.tables.as_ref()
    }

    pub fn set_tables(&mut self, tables: Vec<String>) {
        self.tables = Some(tables);
    }

    // ------------------------------------------------------------------
    // Report path cache
    // ------------------------------------------------------------------

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    pub fn set_report_path(&mut self, path: PathBuf) {
        self.report_path = Some(path);
    }

    /// Drop the cached report path so the next analyze regenerates.
    pub fn clear_report_path(&mut self) {
        self.report_path = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::DataFrame;

    fn session() -> Session {
        Session::new(PathBuf::from("./reports"))
    }

    fn dataset(name: &str, origin: SourceKind) -> LoadedDataset {
        LoadedDataset {
            df: DataFrame::default(),
            name: name.to_string(),
            origin,
        }
    }

    #[test]
    fn test_source_change_clears_report_path() {
        let mut s = session();
        s.set_source(SourceKind::File);
        s.set_report_path(PathBuf::from("reports/a.html"));

        s.set_source(SourceKind::Database);
        assert!(s.report_path().is_none());
    }

    #[test]
    fn test_same_source_keeps_report_path() {
        let mut s = session();
        s.set_source(SourceKind::File);
        s.set_report_path(PathBuf::from("reports/a.html"));

        s.set_source(SourceKind::File);
        assert!(s.report_path().is_some());
    }

    #[test]
    fn test_dataset_replacement_clears_report_path() {
        let mut s = session();
        s.set_dataset(dataset("first", SourceKind::File));
        s.set_report_path(PathBuf::from("reports/first.html"));

        s.set_dataset(dataset("second", SourceKind::File));
        assert!(s.report_path().is_none());
        assert_eq!(s.dataset().unwrap().name, "second");
    }

    #[test]
    fn test_schema_change_clears_tables_only() {
        let mut s = session();
        s.set_tables(vec!["orders".to_string()]);
        s.set_report_path(PathBuf::from("reports/a.html"));

        s.select_schema("public".to_string());
        assert!(s.tables().is_none());
        assert!(s.report_path().is_some());
    }

    #[test]
    fn test_reselecting_same_schema_keeps_tables() {
        let mut s = session();
        s.select_schema("public".to_string());
        s.set_tables(vec!["orders".to_string()]);

        s.select_schema("public".to_string());
        assert!(s.tables().is_some());
    }

    #[test]
    fn test_require_dataset_reports_no_data() {
        let s = session();
        let error = s.require_dataset().unwrap_err();
        assert_eq!(error.error_code(), "NO_DATA_LOADED");
    }

    #[test]
    fn test_require_connection_reports_no_connection() {
        let s = session();
        let error = s.require_connection().unwrap_err();
        assert_eq!(error.error_code(), "NO_CONNECTION");
    }

    #[test]
    fn test_reset_forces_regeneration() {
        let mut s = session();
        s.set_dataset(dataset("data", SourceKind::File));
        s.set_report_path(PathBuf::from("reports/data.html"));
        assert!(s.report_path().is_some());

        s.clear_report_path();
        assert!(s.report_path().is_none());
    }
}
