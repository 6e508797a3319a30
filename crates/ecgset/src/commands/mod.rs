use std::path::Path;

use anyhow::{Context, Result};
use ecgset_core::PipelineConfig;

pub mod build;
pub mod inspect;

/// Settings from `--config` when given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}
