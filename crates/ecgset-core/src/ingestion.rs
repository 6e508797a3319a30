use std::path::{Path, PathBuf};

use ecgset_parser::parse_recording;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::IngestError;
use crate::normalize::{normalize_recording, NormalizedRecord};

/// A recording file found inside a cohort directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub path: PathBuf,
    pub cohort: String,
}

impl SourceFile {
    pub fn new(path: PathBuf, cohort: impl Into<String>) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            path,
            cohort: cohort.into(),
        }
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub source: SourceFile,
    pub result: Result<NormalizedRecord, IngestError>,
}

impl FileOutcome {
    pub fn is_parsed(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortScan {
    pub cohort: String,
    pub directory: PathBuf,
    /// `None` when the cohort directory does not exist.
    pub files_found: Option<usize>,
    /// Set when the directory exists but could not be listed.
    pub listing_error: Option<String>,
}

/// Everything one ingestion run produced, successes and failures alike.
#[derive(Debug, Default)]
pub struct IngestionBatch {
    pub outcomes: Vec<FileOutcome>,
    pub cohorts: Vec<CohortScan>,
}

impl IngestionBatch {
    /// Successfully normalized records in cohort-then-discovery order.
    pub fn records(&self) -> Vec<&NormalizedRecord> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&SourceFile, &IngestError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((&outcome.source, err)),
        })
    }

    pub fn missing_cohorts(&self) -> Vec<&str> {
        self.cohorts
            .iter()
            .filter(|scan| scan.files_found.is_none() && scan.listing_error.is_none())
            .map(|scan| scan.cohort.as_str())
            .collect()
    }

    /// Cohorts whose directory exists but could not be listed, with the reason.
    pub fn unlisted_cohorts(&self) -> Vec<(&str, &str)> {
        self.cohorts
            .iter()
            .filter_map(|scan| {
                scan.listing_error
                    .as_deref()
                    .map(|reason| (scan.cohort.as_str(), reason))
            })
            .collect()
    }

    pub fn parsed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_parsed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.parsed_count()
    }
}

/// Files found in one cohort directory. Entries the directory walk could not read are
/// kept as failed outcomes so they show up in the batch report.
#[derive(Debug, Default)]
pub struct CohortListing {
    pub files: Vec<SourceFile>,
    pub unreadable: Vec<FileOutcome>,
}

impl CohortListing {
    pub fn len(&self) -> usize {
        self.files.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lists recording files directly inside `directory`.
///
/// Returns `Ok(None)` when the directory is absent. Files come back in the order the
/// glob walk yields them (sorted by path); callers should not rely on any order across
/// platforms.
pub fn discover_cohort_files(
    directory: &Path,
    cohort: &str,
    extension: &str,
) -> Result<Option<CohortListing>, IngestError> {
    if !directory.is_dir() {
        return Ok(None);
    }

    let dir_str = directory
        .to_str()
        .ok_or_else(|| IngestError::NonUtf8Path(directory.to_path_buf()))?;
    let pattern = format!("{}/*.{}", glob::Pattern::escape(dir_str), extension);

    let mut listing = CohortListing::default();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => listing.files.push(SourceFile::new(path, cohort)),
            Ok(path) => debug!(path = %path.display(), "skipping non-file match"),
            Err(err) => {
                let source = SourceFile::new(err.path().to_path_buf(), cohort);
                let result = Err(IngestError::Read {
                    path: source.path.clone(),
                    source: err.into(),
                });
                listing.unreadable.push(FileOutcome { source, result });
            }
        }
    }

    Ok(Some(listing))
}

/// Reads, parses and normalizes a single recording.
pub fn ingest_file(source: &SourceFile, lead_prefix: &str) -> Result<NormalizedRecord, IngestError> {
    let bytes = std::fs::read(&source.path).map_err(|err| IngestError::Read {
        path: source.path.clone(),
        source: err,
    })?;
    let content = std::str::from_utf8(&bytes).map_err(|_| IngestError::NotUtf8 {
        path: source.path.clone(),
    })?;

    let recording = parse_recording(content)?;
    normalize_recording(source.clone(), recording, lead_prefix)
}

/// Walks every configured cohort and ingests its files. A missing cohort or an
/// unreadable file is logged and skipped; the batch itself never fails.
pub fn ingest_cohorts(config: &PipelineConfig) -> IngestionBatch {
    let mut batch = IngestionBatch::default();

    for cohort in &config.cohorts {
        let directory = config.cohort_dir(cohort);

        let discovered = match discover_cohort_files(&directory, cohort, &config.extension) {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                warn!(
                    cohort = %cohort,
                    base_path = %config.base_path.display(),
                    "cohort folder not found"
                );
                batch.cohorts.push(CohortScan {
                    cohort: cohort.clone(),
                    directory,
                    files_found: None,
                    listing_error: None,
                });
                continue;
            }
            Err(err) => {
                warn!(cohort = %cohort, "failed to list cohort folder: {err}");
                batch.cohorts.push(CohortScan {
                    cohort: cohort.clone(),
                    directory,
                    files_found: None,
                    listing_error: Some(err.to_string()),
                });
                continue;
            }
        };

        info!(cohort = %cohort, files = discovered.len(), "processing cohort folder");
        batch.cohorts.push(CohortScan {
            cohort: cohort.clone(),
            directory,
            files_found: Some(discovered.len()),
            listing_error: None,
        });

        let outcomes = discovered.unreadable.into_iter().chain(
            discovered.files.into_iter().map(|source| {
                let result = ingest_file(&source, &config.lead_prefix);
                FileOutcome { source, result }
            }),
        );

        for outcome in outcomes {
            match &outcome.result {
                Ok(record) => debug!(
                    path = %outcome.source.path.display(),
                    samples = record.num_samples,
                    leads = record.leads.len(),
                    "recording normalized"
                ),
                Err(err) => warn!(
                    path = %outcome.source.path.display(),
                    "error processing recording: {err}"
                ),
            }
            batch.outcomes.push(outcome);
        }
    }

    batch
}
