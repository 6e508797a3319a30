mod common;
mod tab_delimited;

pub use tab_delimited::RecordingParser;

pub(crate) use common::{
    build_recording_dataframe, classify_header, clean_optional, parse_optional_f64,
    parse_required_i64, ColumnRole, RecordingColumns,
};

use crate::errors::ParserError;
use crate::model::ParsedRecording;

/// Parses a tab-separated recording export with a header row.
pub fn parse_recording(content: &str) -> Result<ParsedRecording, ParserError> {
    RecordingParser::default().parse(content)
}
