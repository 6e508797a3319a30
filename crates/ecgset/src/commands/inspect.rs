use std::path::Path;

use anyhow::Result;
use ecgset_core::dataset::row_lead_lengths;
use ecgset_core::{load, summarize_dataset};

use super::load_config;
use crate::report;

const PREVIEW_ROWS: usize = 10;

pub fn run(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    let Some(df) = load(path) else {
        println!("No data available");
        return Ok(());
    };

    let summary = summarize_dataset(&df, &config.cohorts, PREVIEW_ROWS)?;
    report::print_summary(&summary);

    if df.height() > 0 {
        let lengths = row_lead_lengths(&df, 0, &config.lead_prefix)?;
        report::print_lead_lengths(&lengths);
    }
    Ok(())
}
