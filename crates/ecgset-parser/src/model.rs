use polars::prelude::*;

/// Column holding the per-row sample index.
pub const SAMPLE_INDEX_COLUMN: &str = "samplenr";

/// Column that recording exports carry but never fill.
pub const MEASUREMENT_COLUMN: &str = "measurement";

/// One recording file as parsed from disk, before any normalization.
///
/// `df` holds `samplenr` as Int64, an optional `measurement` column as raw nullable text,
/// and every other header column as a nullable Float64 lead, in header order.
#[derive(Debug, Clone)]
pub struct ParsedRecording {
    pub df: DataFrame,
}

impl ParsedRecording {
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_names().contains(&name)
    }

    /// Lead column names in header order: everything except the sample index and the
    /// measurement placeholder.
    pub fn lead_names(&self) -> Vec<&str> {
        self.column_names()
            .into_iter()
            .filter(|name| *name != SAMPLE_INDEX_COLUMN && *name != MEASUREMENT_COLUMN)
            .collect()
    }
}
