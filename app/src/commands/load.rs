//! File and spreadsheet loading commands.

use std::path::Path;

use datalens_processing::sources::{load_csv_file, load_sheet};
use datalens_processing::{LensError, LoadedDataset};
use polars::prelude::DataFrame;

use crate::session::Session;

/// `open <file.csv>` — load a CSV file into the session.
pub fn open_file(session: &mut Session, path: &Path) -> Result<(), LensError> {
    let dataset = load_csv_file(path)?;
    announce(&dataset);
    print_sample(&dataset.df, 5);
    session.set_dataset(dataset);
    Ok(())
}

/// `sheet <share-link>` — fetch a shared spreadsheet.
pub async fn open_sheet(session: &mut Session, link: &str) -> Result<(), LensError> {
    let dataset = load_sheet(link).await?;
    announce(&dataset);
    print_sample(&dataset.df, 5);
    session.set_dataset(dataset);
    Ok(())
}

fn announce(dataset: &LoadedDataset) {
    println!(
        "Loaded {} ({} rows x {} columns, {})",
        dataset.name,
        dataset.df.height(),
        dataset.df.width(),
        dataset.origin.label()
    );
}

/// Print the first rows of a frame through the Polars table formatter.
pub(crate) fn print_sample(df: &DataFrame, rows: usize) {
    println!("{}", df.head(Some(rows)));
}
