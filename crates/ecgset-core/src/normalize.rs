use ecgset_parser::{ParsedRecording, MEASUREMENT_COLUMN, SAMPLE_INDEX_COLUMN};

use crate::error::IngestError;
use crate::ingestion::SourceFile;

/// One lead of a recording, renamed to its dataset field.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSeries {
    /// Header name in the source file, e.g. `II`.
    pub column: String,
    /// Dataset field name, e.g. `timeseries_II`.
    pub field: String,
    pub values: Vec<Option<f64>>,
}

/// The per-file unit that becomes one dataset row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub source: SourceFile,
    pub num_samples: usize,
    pub leads: Vec<LeadSeries>,
    pub sample_numbers: Vec<i64>,
}

impl NormalizedRecord {
    pub fn lead(&self, field: &str) -> Option<&LeadSeries> {
        self.leads.iter().find(|lead| lead.field == field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.leads.iter().map(|lead| lead.field.as_str())
    }
}

/// Drops the measurement placeholder and reshapes a parsed recording into a record.
pub fn normalize_recording(
    source: SourceFile,
    recording: ParsedRecording,
    lead_prefix: &str,
) -> Result<NormalizedRecord, IngestError> {
    let mut df = recording.df;
    if df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == MEASUREMENT_COLUMN)
    {
        df = df.drop(MEASUREMENT_COLUMN)?;
    }

    let num_samples = df.height();
    let sample_numbers: Vec<i64> = df
        .column(SAMPLE_INDEX_COLUMN)?
        .i64()?
        .into_iter()
        .map(|value| value.unwrap_or_default())
        .collect();

    let mut leads = Vec::with_capacity(df.width().saturating_sub(1));
    for column in df.get_columns() {
        let name = column.name().as_str();
        if name == SAMPLE_INDEX_COLUMN {
            continue;
        }
        let values: Vec<Option<f64>> = column.f64()?.into_iter().collect();
        leads.push(LeadSeries {
            column: name.to_string(),
            field: format!("{lead_prefix}{name}"),
            values,
        });
    }

    Ok(NormalizedRecord {
        source,
        num_samples,
        leads,
        sample_numbers,
    })
}
