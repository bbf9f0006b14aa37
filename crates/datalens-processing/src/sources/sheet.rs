//! Spreadsheet share-link import.
//!
//! A shareable spreadsheet link points at the interactive editor, not at
//! the data. The adapter rewrites the `/edit#gid=<n>` fragment into the
//! CSV-export form, fetches the export over HTTP and parses the body as
//! CSV text.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{LensError, Result};
use crate::sources::file::read_csv_text;
use crate::types::{LoadedDataset, SourceKind};

const EDIT_FRAGMENT: &str = "/edit#gid=";
const EXPORT_FRAGMENT: &str = "/export?format=csv&gid=";
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Rewrite a shareable spreadsheet link into its CSV-export form.
///
/// Only the `/edit#gid=<n>` link shape is supported. Links without that
/// fragment are rejected with [`LensError::UnsupportedShareLink`] rather
/// than rewritten on a guess.
pub fn export_url_from_share_link(link: &str) -> Result<String> {
    if link.contains(EDIT_FRAGMENT) {
        Ok(link.replacen(EDIT_FRAGMENT, EXPORT_FRAGMENT, 1))
    } else {
        Err(LensError::UnsupportedShareLink(link.to_string()))
    }
}

/// Derive a short dataset name from the document id in the link.
fn sheet_name_from_link(link: &str) -> String {
    link.split("/d/")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .filter(|id| !id.is_empty())
        .map(|id| format!("sheet_{}", id.chars().take(8).collect::<String>()))
        .unwrap_or_else(|| "sheet".to_string())
}

/// Fetch a shared spreadsheet and parse it into a dataset.
pub async fn load_sheet(link: &str) -> Result<LoadedDataset> {
    let url = export_url_from_share_link(link)?;
    debug!("fetching spreadsheet export: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| LensError::Fetch(e.to_string()))?;

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| LensError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LensError::Fetch(format!(
            "server returned {} for {}",
            status, url
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| LensError::Fetch(e.to_string()))?;

    let df = read_csv_text(&body).map_err(|e| LensError::Parse {
        source_name: "spreadsheet".to_string(),
        reason: e.to_string(),
    })?;

    info!(
        "spreadsheet loaded ({} rows x {} columns)",
        df.height(),
        df.width()
    );

    Ok(LoadedDataset {
        df,
        name: sheet_name_from_link(link),
        origin: SourceKind::Sheet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_edit_fragment() {
        let link = "https://docs.google.com/spreadsheets/d/abc123/edit#gid=0";
        let url = export_url_from_share_link(link).unwrap();
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_rewrite_preserves_gid() {
        let link = "https://docs.google.com/spreadsheets/d/abc123/edit#gid=1977446384";
        let url = export_url_from_share_link(link).unwrap();
        assert!(url.ends_with("/export?format=csv&gid=1977446384"));
    }

    #[test]
    fn test_link_without_pattern_is_rejected() {
        let link = "https://docs.google.com/spreadsheets/d/abc123/view";
        let error = export_url_from_share_link(link).unwrap_err();
        assert_eq!(error.error_code(), "UNSUPPORTED_SHARE_LINK");
    }

    #[test]
    fn test_edit_without_gid_is_rejected() {
        let link = "https://docs.google.com/spreadsheets/d/abc123/edit?usp=sharing";
        assert!(export_url_from_share_link(link).is_err());
    }

    #[test]
    fn test_sheet_name_from_link() {
        let link = "https://docs.google.com/spreadsheets/d/1aBcDeFgHiJk/edit#gid=0";
        assert_eq!(sheet_name_from_link(link), "sheet_1aBcDeFg");
        assert_eq!(sheet_name_from_link("https://example.com/data"), "sheet");
    }
}
