use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_COHORTS: [&str; 2] = ["control", "Amyloidosis"];
pub const DEFAULT_EXTENSION: &str = "csv";
pub const DEFAULT_LEAD_PREFIX: &str = "timeseries_";
pub const DEFAULT_OUTPUT: &str = "timeseries_data.zip";

/// Settings for one ingestion run. Every field falls back to its default when absent
/// from the TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding one subdirectory per cohort.
    pub base_path: PathBuf,
    /// Cohort names, in the order their rows appear in the dataset.
    pub cohorts: Vec<String>,
    /// File extension (without the dot) of recording files.
    pub extension: String,
    /// Prefix applied to lead column names in the dataset.
    pub lead_prefix: String,
    /// Destination of the persisted dataset.
    pub output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            cohorts: DEFAULT_COHORTS.iter().map(|c| c.to_string()).collect(),
            extension: DEFAULT_EXTENSION.to_string(),
            lead_prefix: DEFAULT_LEAD_PREFIX.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: PipelineConfig = toml::from_str(content)?;
        config.extension = config.extension.trim_start_matches('.').to_string();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn cohort_dir(&self, cohort: &str) -> PathBuf {
        self.base_path.join(cohort)
    }

    pub fn field_name(&self, lead: &str) -> String {
        format!("{}{lead}", self.lead_prefix)
    }
}
