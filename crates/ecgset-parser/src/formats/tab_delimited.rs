use crate::errors::ParserError;
use crate::model::{ParsedRecording, SAMPLE_INDEX_COLUMN};

use super::{
    build_recording_dataframe, classify_header, clean_optional, parse_optional_f64,
    parse_required_i64, ColumnRole, RecordingColumns,
};

/// Reader for delimited recording exports: one header row, then one row per sample.
#[derive(Debug, Clone, Copy)]
pub struct RecordingParser {
    delimiter: u8,
}

impl Default for RecordingParser {
    fn default() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl RecordingParser {
    const NAME: &'static str = "DELIMITED_RECORDING";

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn parse(&self, content: &str) -> Result<ParsedRecording, ParserError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = records
            .next()
            .ok_or(ParserError::MissingHeader { parser: Self::NAME })?
            .map_err(|err| ParserError::Csv {
                parser: Self::NAME,
                source: err,
            })?;

        let mut columns = RecordingColumns::new();
        let roles = classify_header(Self::NAME, &header, &mut columns)?;

        for (row_idx, record) in records.enumerate() {
            let record = record.map_err(|err| ParserError::Csv {
                parser: Self::NAME,
                source: err,
            })?;

            // Blank lines are skipped by the reader, so count from the record position.
            let line_index = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(row_idx + 2);

            if record.len() > roles.len() {
                return Err(ParserError::DataRow {
                    parser: Self::NAME,
                    line_index,
                    message: format!(
                        "expected at most {} columns but found {}",
                        roles.len(),
                        record.len()
                    ),
                });
            }

            // Short rows leave the trailing cells empty.
            for (idx, role) in roles.iter().enumerate() {
                let header_name = header.get(idx).unwrap_or("").trim();
                let value = record.get(idx).unwrap_or("");
                match role {
                    ColumnRole::SampleIndex => {
                        let sample =
                            parse_required_i64(Self::NAME, value, line_index, SAMPLE_INDEX_COLUMN)?;
                        columns.sample_index.push(sample);
                    }
                    ColumnRole::Measurement => {
                        columns.push_measurement(clean_optional(value));
                    }
                    ColumnRole::Lead(lead_idx) => {
                        let parsed = parse_optional_f64(Self::NAME, value, line_index, header_name)?;
                        columns.push_lead(*lead_idx, parsed);
                    }
                    ColumnRole::Ignored => {}
                }
            }
        }

        let df = build_recording_dataframe(Self::NAME, columns)?;
        Ok(ParsedRecording { df })
    }
}
