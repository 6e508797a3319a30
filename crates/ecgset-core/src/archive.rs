use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use ::zip::{write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};
use chrono::Utc;
use polars::io::parquet::write::{ParquetCompression, StatisticsOptions};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::dataset::{lead_series_dtype, sample_numbers_dtype};
use crate::error::ArchiveError;

pub const ARCHIVE_FORMAT: &str = "ecgset-dataset";
pub const ARCHIVE_FORMAT_VERSION: u32 = 1;

const MANIFEST_PATH: &str = "manifest.json";
const TABLE_PATH: &str = "table.parquet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    Count,
    FloatSeries,
    IndexSeries,
}

impl ColumnKind {
    fn from_dtype(name: &str, dtype: &DataType) -> Result<Self, ArchiveError> {
        if *dtype == DataType::String {
            Ok(ColumnKind::Text)
        } else if *dtype == DataType::UInt64 {
            Ok(ColumnKind::Count)
        } else if *dtype == lead_series_dtype() {
            Ok(ColumnKind::FloatSeries)
        } else if *dtype == sample_numbers_dtype() {
            Ok(ColumnKind::IndexSeries)
        } else {
            Err(ArchiveError::UnsupportedColumn {
                name: name.to_string(),
                dtype: dtype.to_string(),
            })
        }
    }

    fn dtype(&self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Count => DataType::UInt64,
            ColumnKind::FloatSeries => lead_series_dtype(),
            ColumnKind::IndexSeries => sample_numbers_dtype(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestColumn {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format: String,
    pub format_version: u32,
    pub created_at: String,
    pub row_count: usize,
    pub table_path: String,
    pub columns: Vec<ManifestColumn>,
}

impl Manifest {
    fn describe(df: &DataFrame) -> Result<Self, ArchiveError> {
        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                let name = column.name().as_str();
                Ok(ManifestColumn {
                    name: name.to_string(),
                    kind: ColumnKind::from_dtype(name, column.dtype())?,
                })
            })
            .collect::<Result<Vec<_>, ArchiveError>>()?;

        Ok(Manifest {
            format: ARCHIVE_FORMAT.to_string(),
            format_version: ARCHIVE_FORMAT_VERSION,
            created_at: Utc::now().to_rfc3339(),
            row_count: df.height(),
            table_path: TABLE_PATH.to_string(),
            columns,
        })
    }

    fn check_supported(&self) -> Result<(), ArchiveError> {
        if self.format != ARCHIVE_FORMAT || self.format_version > ARCHIVE_FORMAT_VERSION {
            return Err(ArchiveError::UnsupportedFormat {
                format: self.format.clone(),
                version: self.format_version,
            });
        }
        Ok(())
    }

    fn check_table(&self, df: &DataFrame) -> Result<(), ArchiveError> {
        if df.height() != self.row_count {
            return Err(ArchiveError::ManifestMismatch(format!(
                "manifest lists {} rows, table has {}",
                self.row_count,
                df.height()
            )));
        }

        let names: Vec<&str> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        let expected: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        if names != expected {
            return Err(ArchiveError::ManifestMismatch(format!(
                "manifest columns {expected:?} differ from table columns {names:?}"
            )));
        }

        for (column, described) in df.get_columns().iter().zip(&self.columns) {
            if *column.dtype() != described.kind.dtype() {
                return Err(ArchiveError::ManifestMismatch(format!(
                    "column '{}' decoded as {}, manifest says {:?}",
                    described.name,
                    column.dtype(),
                    described.kind
                )));
            }
        }
        Ok(())
    }
}

/// Encodes a dataset table as a zip archive holding `manifest.json` and the table as
/// parquet.
pub fn encode_dataset(df: &DataFrame) -> Result<Vec<u8>, ArchiveError> {
    let manifest = Manifest::describe(df)?;
    let manifest_bytes = serde_json::to_vec_pretty(&manifest)?;

    let mut table_bytes = Vec::new();
    let mut df_clone = df.clone();
    ParquetWriter::new(&mut table_bytes)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(&mut df_clone)?;

    let cursor = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(cursor);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(MANIFEST_PATH, options)?;
    zip.write_all(&manifest_bytes)?;

    // parquet is already compressed
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file(&manifest.table_path, stored)?;
    zip.write_all(&table_bytes)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn decode_dataset(bytes: &[u8]) -> Result<DataFrame, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let manifest: Manifest = {
        let mut manifest_file = archive
            .by_name(MANIFEST_PATH)
            .map_err(|_| ArchiveError::MissingManifest)?;
        let mut manifest_bytes = Vec::new();
        manifest_file.read_to_end(&mut manifest_bytes)?;
        serde_json::from_slice(&manifest_bytes)?
    };
    manifest.check_supported()?;

    let df = {
        let mut table_file = archive
            .by_name(&manifest.table_path)
            .map_err(|_| ArchiveError::MissingDataFile(manifest.table_path.clone()))?;
        let mut table_bytes = Vec::new();
        table_file.read_to_end(&mut table_bytes)?;
        ParquetReader::new(Cursor::new(table_bytes)).finish()?
    };
    manifest.check_table(&df)?;

    Ok(df)
}

/// Writes the archive next to `path` and renames it into place once complete.
pub fn write_dataset(df: &DataFrame, path: &Path) -> Result<(), ArchiveError> {
    let bytes = encode_dataset(df)?;
    let tmp_path = staging_path(path);

    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(&bytes)?;
        file.sync_all()
    });
    if let Err(err) = written.and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

pub fn read_dataset(path: &Path) -> Result<DataFrame, ArchiveError> {
    let bytes = fs::read(path)?;
    decode_dataset(&bytes)
}

/// Persists the dataset, logging instead of propagating failures.
pub fn persist(df: &DataFrame, path: &Path) -> bool {
    match write_dataset(df, path) {
        Ok(()) => {
            info!(path = %path.display(), rows = df.height(), "dataset saved");
            true
        }
        Err(err) => {
            error!(path = %path.display(), "error saving dataset: {err}");
            false
        }
    }
}

/// Loads a persisted dataset. `None` means no usable data was found at `path`.
pub fn load(path: &Path) -> Option<DataFrame> {
    match read_dataset(path) {
        Ok(df) => {
            info!(path = %path.display(), rows = df.height(), "dataset loaded");
            Some(df)
        }
        Err(err) => {
            error!(path = %path.display(), "error loading dataset: {err}");
            None
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    path.with_file_name(format!(".{file_name}.partial"))
}
