// crates/ecgset-core/src/error.rs

use std::path::PathBuf;

use ecgset_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("path {0} is not valid UTF-8 and cannot be globbed")]
    NonUtf8Path(PathBuf),

    #[error("invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Parse(#[from] ParserError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("dataset is missing column '{0}'")]
    MissingColumn(&'static str),
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("JSON operation failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ZIP operation failed: {0}")]
    Zip(#[from] ::zip::result::ZipError),
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Manifest is missing or corrupt")]
    MissingManifest,
    #[error("Data file '{0}' is missing from archive")]
    MissingDataFile(String),
    #[error("unsupported archive format '{format}' version {version}")]
    UnsupportedFormat { format: String, version: u32 },
    #[error("column '{name}' has unsupported type {dtype}")]
    UnsupportedColumn { name: String, dtype: String },
    #[error("archive manifest does not match table: {0}")]
    ManifestMismatch(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
