use std::collections::HashSet;

use polars::prelude::*;

use crate::error::AssemblyError;
use crate::normalize::NormalizedRecord;

pub const FILENAME_COLUMN: &str = "filename";
pub const FILEPATH_COLUMN: &str = "filepath";
pub const GROUP_COLUMN: &str = "group";
pub const NUM_SAMPLES_COLUMN: &str = "num_samples";
pub const SAMPLE_NUMBERS_COLUMN: &str = "sample_numbers";

pub fn lead_series_dtype() -> DataType {
    DataType::List(Box::new(DataType::Float64))
}

pub fn sample_numbers_dtype() -> DataType {
    DataType::List(Box::new(DataType::Int64))
}

/// Lead field names across all records, in the order they are first seen.
pub fn lead_field_union(records: &[&NormalizedRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut fields = Vec::new();
    for record in records {
        for field in record.field_names() {
            if seen.insert(field) {
                fields.push(field.to_string());
            }
        }
    }
    fields
}

/// Builds the dataset table with one row per record.
///
/// Column layout: `filename`, `filepath`, `group`, `num_samples`, the lead fields from
/// [`lead_field_union`], then `sample_numbers`. A record without a given lead gets a
/// null cell in that column; list lengths are left as they are.
pub fn assemble_dataset(records: &[&NormalizedRecord]) -> Result<DataFrame, AssemblyError> {
    let lead_fields = lead_field_union(records);

    let filenames: Vec<&str> = records
        .iter()
        .map(|record| record.source.file_name.as_str())
        .collect();
    let filepaths: Vec<String> = records
        .iter()
        .map(|record| record.source.path.display().to_string())
        .collect();
    let groups: Vec<&str> = records
        .iter()
        .map(|record| record.source.cohort.as_str())
        .collect();
    let num_samples: Vec<u64> = records
        .iter()
        .map(|record| record.num_samples as u64)
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(lead_fields.len() + 5);
    columns.push(Series::new(FILENAME_COLUMN.into(), filenames).into());
    columns.push(Series::new(FILEPATH_COLUMN.into(), filepaths).into());
    columns.push(Series::new(GROUP_COLUMN.into(), groups).into());
    columns.push(Series::new(NUM_SAMPLES_COLUMN.into(), num_samples).into());

    for field in &lead_fields {
        let cells: Vec<Option<Series>> = records
            .iter()
            .map(|record| {
                record
                    .lead(field)
                    .map(|lead| Series::new("".into(), lead.values.as_slice()))
            })
            .collect();
        columns.push(list_column(field, cells, lead_series_dtype())?.into());
    }

    let sample_cells: Vec<Option<Series>> = records
        .iter()
        .map(|record| Some(Series::new("".into(), record.sample_numbers.as_slice())))
        .collect();
    columns.push(list_column(SAMPLE_NUMBERS_COLUMN, sample_cells, sample_numbers_dtype())?.into());

    Ok(DataFrame::new(columns)?)
}

fn list_column(name: &str, cells: Vec<Option<Series>>, dtype: DataType) -> PolarsResult<Series> {
    if cells.is_empty() {
        return Ok(Series::new_empty(name.into(), &dtype));
    }
    let list: ListChunked = cells.into_iter().collect();
    list.into_series().with_name(name.into()).cast(&dtype)
}

/// Row counts per cohort, in `cohorts` order. Groups not listed in `cohorts` follow in
/// the order they first appear.
pub fn cohort_counts(df: &DataFrame, cohorts: &[String]) -> Result<Vec<(String, usize)>, AssemblyError> {
    let groups = df
        .column(GROUP_COLUMN)
        .map_err(|_| AssemblyError::MissingColumn(GROUP_COLUMN))?
        .str()?;

    let mut counts: Vec<(String, usize)> = cohorts.iter().map(|c| (c.clone(), 0)).collect();
    for group in groups.into_iter().flatten() {
        match counts.iter_mut().find(|(name, _)| name.as_str() == group) {
            Some(entry) => entry.1 += 1,
            None => counts.push((group.to_string(), 1)),
        }
    }
    Ok(counts)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub filename: String,
    pub group: String,
    pub num_samples: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub total_rows: usize,
    pub cohort_counts: Vec<(String, usize)>,
    pub columns: Vec<String>,
    pub preview: Vec<PreviewRow>,
}

impl DatasetSummary {
    pub fn count_for(&self, cohort: &str) -> usize {
        self.cohort_counts
            .iter()
            .find(|(name, _)| name == cohort)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

pub fn summarize_dataset(
    df: &DataFrame,
    cohorts: &[String],
    preview_rows: usize,
) -> Result<DatasetSummary, AssemblyError> {
    let filenames = df
        .column(FILENAME_COLUMN)
        .map_err(|_| AssemblyError::MissingColumn(FILENAME_COLUMN))?
        .str()?;
    let groups = df
        .column(GROUP_COLUMN)
        .map_err(|_| AssemblyError::MissingColumn(GROUP_COLUMN))?
        .str()?;
    let samples = df
        .column(NUM_SAMPLES_COLUMN)
        .map_err(|_| AssemblyError::MissingColumn(NUM_SAMPLES_COLUMN))?
        .u64()?;

    let preview = (0..df.height().min(preview_rows))
        .map(|idx| PreviewRow {
            filename: filenames.get(idx).unwrap_or_default().to_string(),
            group: groups.get(idx).unwrap_or_default().to_string(),
            num_samples: samples.get(idx).unwrap_or_default(),
        })
        .collect();

    Ok(DatasetSummary {
        total_rows: df.height(),
        cohort_counts: cohort_counts(df, cohorts)?,
        columns: df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
        preview,
    })
}

/// Length of every lead list in one row; `None` marks a lead the row does not have.
pub fn row_lead_lengths(
    df: &DataFrame,
    row: usize,
    lead_prefix: &str,
) -> Result<Vec<(String, Option<usize>)>, AssemblyError> {
    let mut lengths = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if !name.starts_with(lead_prefix) {
            continue;
        }
        let length = column.list()?.get_as_series(row).map(|series| series.len());
        lengths.push((name.to_string(), length));
    }
    Ok(lengths)
}
