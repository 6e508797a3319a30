use polars::prelude::*;

use crate::errors::ParserError;
use crate::model::{MEASUREMENT_COLUMN, SAMPLE_INDEX_COLUMN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnRole {
    SampleIndex,
    Measurement,
    /// Index into `RecordingColumns::leads`.
    Lead(usize),
    /// Blank header cell, typically produced by a trailing delimiter.
    Ignored,
}

#[derive(Debug, Clone)]
pub(crate) struct LeadColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordingColumns {
    pub(crate) sample_index: Vec<i64>,
    pub(crate) measurement: Option<Vec<Option<String>>>,
    pub(crate) leads: Vec<LeadColumn>,
}

impl RecordingColumns {
    pub(crate) fn new() -> Self {
        Self {
            sample_index: Vec::new(),
            measurement: None,
            leads: Vec::new(),
        }
    }

    pub(crate) fn add_lead(&mut self, name: impl Into<String>) -> usize {
        self.leads.push(LeadColumn {
            name: name.into(),
            values: Vec::new(),
        });
        self.leads.len() - 1
    }

    pub(crate) fn enable_measurement(&mut self) {
        if self.measurement.is_none() {
            self.measurement = Some(Vec::new());
        }
    }

    pub(crate) fn push_lead(&mut self, index: usize, value: Option<f64>) {
        if let Some(lead) = self.leads.get_mut(index) {
            lead.values.push(value);
        }
    }

    pub(crate) fn push_measurement(&mut self, value: Option<String>) {
        if let Some(values) = self.measurement.as_mut() {
            values.push(value);
        }
    }
}

impl Default for RecordingColumns {
    fn default() -> Self {
        Self::new()
    }
}

/// Assigns a role to every header cell and rejects headers without a usable
/// sample index.
pub(crate) fn classify_header(
    parser: &'static str,
    header: &csv::StringRecord,
    columns: &mut RecordingColumns,
) -> Result<Vec<ColumnRole>, ParserError> {
    let mut roles = Vec::with_capacity(header.len());
    let mut seen: Vec<&str> = Vec::with_capacity(header.len());

    for raw in header.iter() {
        let name = raw.trim_start_matches('\u{feff}').trim();
        if name.is_empty() {
            roles.push(ColumnRole::Ignored);
            continue;
        }
        if seen.contains(&name) {
            return Err(ParserError::InvalidHeader {
                parser,
                message: format!("duplicate column '{name}'"),
            });
        }
        seen.push(name);

        let role = if name == SAMPLE_INDEX_COLUMN {
            ColumnRole::SampleIndex
        } else if name == MEASUREMENT_COLUMN {
            columns.enable_measurement();
            ColumnRole::Measurement
        } else {
            ColumnRole::Lead(columns.add_lead(name))
        };
        roles.push(role);
    }

    if !roles.contains(&ColumnRole::SampleIndex) {
        return Err(ParserError::MissingColumn {
            parser,
            column: SAMPLE_INDEX_COLUMN,
        });
    }

    Ok(roles)
}

pub(crate) fn build_recording_dataframe(
    parser: &'static str,
    columns: RecordingColumns,
) -> Result<DataFrame, ParserError> {
    let row_count = columns.sample_index.len();
    let mut cols: Vec<Column> = Vec::with_capacity(columns.leads.len() + 2);
    cols.push(Series::new(SAMPLE_INDEX_COLUMN.into(), columns.sample_index).into());

    if let Some(values) = columns.measurement {
        let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
        cols.push(Series::new(MEASUREMENT_COLUMN.into(), utf8).into());
    }

    for lead in columns.leads {
        if lead.values.len() != row_count {
            return Err(ParserError::Validation {
                parser,
                message: format!(
                    "lead '{}' had {} rows, expected {row_count}",
                    lead.name,
                    lead.values.len()
                ),
            });
        }
        cols.push(Series::new(lead.name.as_str().into(), lead.values).into());
    }

    DataFrame::new(cols).map_err(|err| ParserError::Validation {
        parser,
        message: format!("failed to build recording dataframe: {err}"),
    })
}

pub(crate) fn parse_required_i64(
    parser: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<i64, ParserError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|err| ParserError::DataRow {
            parser,
            line_index,
            message: format!("failed to parse column '{column}' as integer: {err}"),
        })
}

pub(crate) fn parse_optional_f64(
    parser: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<f64>, ParserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|err| ParserError::DataRow {
            parser,
            line_index,
            message: format!("failed to parse column '{column}' as float: {err}"),
        })
}

pub(crate) fn clean_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
