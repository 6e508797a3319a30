use anyhow::{Context, Result};
use ecgset_core::{
    assemble_dataset, ingest_cohorts, load, persist, summarize_dataset, PipelineConfig,
};
use tracing::{error, info, warn};

use super::load_config;
use crate::report;
use crate::BuildArgs;

const PREVIEW_ROWS: usize = 5;

/// Config file values first, then command-line overrides.
fn resolve_config(args: &BuildArgs) -> Result<PipelineConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(base_path) = &args.base_path {
        config.base_path = base_path.clone();
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    Ok(config)
}

pub fn run(args: BuildArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    info!(
        base_path = %config.base_path.display(),
        cohorts = ?config.cohorts,
        "starting dataset build"
    );

    let batch = ingest_cohorts(&config);
    info!(
        parsed = batch.parsed_count(),
        skipped = batch.failed_count(),
        "ingestion finished"
    );

    let df = match assemble_dataset(&batch.records()) {
        Ok(df) => df,
        Err(err) => {
            error!("failed to assemble dataset: {err}");
            assemble_dataset(&[]).context("failed to build an empty dataset")?
        }
    };

    let summary = summarize_dataset(&df, &config.cohorts, PREVIEW_ROWS)?;
    report::print_summary(&summary);
    report::print_skipped(&batch);

    if persist(&df, &config.output) {
        match load(&config.output) {
            Some(saved) => info!(
                path = %config.output.display(),
                rows = saved.height(),
                columns = saved.width(),
                "verified saved dataset"
            ),
            None => warn!(path = %config.output.display(), "saved dataset could not be reloaded"),
        }
    } else {
        println!("Dataset was not saved to {}", config.output.display());
    }

    Ok(())
}
