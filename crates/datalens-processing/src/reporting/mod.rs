//! Report artifact generation.
//!
//! Turns a dataset and its profile into a self-contained HTML document
//! written under a reports directory, one file per generation,
//! timestamped so earlier artifacts are never overwritten.

mod generator;
mod html;

pub use generator::ReportGenerator;
