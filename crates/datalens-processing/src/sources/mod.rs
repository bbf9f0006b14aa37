//! Data source adapters.
//!
//! Each adapter normalizes one external source into a Polars
//! `DataFrame` wrapped in a [`LoadedDataset`]:
//!
//! - [`load_csv_file`] — local CSV files
//! - [`load_sheet`] — shared spreadsheet links, rewritten to their
//!   CSV-export form and fetched over HTTP
//! - [`DatabaseSource`] — PostgreSQL tables, with schema and table
//!   discovery
//!
//! Adapters never panic on bad input; every failure maps to one of the
//! [`crate::error::LensError`] variants so the front end can report it
//! and continue.
//!
//! [`LoadedDataset`]: crate::types::LoadedDataset

mod file;
mod sheet;

pub mod database;

pub use database::{ConnectionConfig, ConnectionParams, DatabaseSource};
pub use file::load_csv_file;
pub use sheet::{export_url_from_share_link, load_sheet};
