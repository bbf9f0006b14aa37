//! Tuning knobs for profiling and report generation.

use serde::{Deserialize, Serialize};

/// Controls how much work the profiler and the report generator do per
/// column. The defaults are sized for interactive use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Values sampled per column when inferring the semantic type.
    pub sample_values: usize,
    /// Number of bins in numeric histograms.
    pub histogram_bins: usize,
    /// Number of most-frequent values kept for non-numeric columns.
    pub top_values: usize,
    /// Rows shown in the report's data preview.
    pub preview_rows: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sample_values: 10,
            histogram_bins: 10,
            top_values: 10,
            preview_rows: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_positive() {
        let config = ProfileConfig::default();
        assert!(config.sample_values > 0);
        assert!(config.histogram_bins > 0);
        assert!(config.top_values > 0);
        assert!(config.preview_rows > 0);
    }
}
