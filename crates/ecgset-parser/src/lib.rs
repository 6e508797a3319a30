pub mod errors;
pub mod formats;
pub mod model;

pub use errors::ParserError;
pub use formats::{parse_recording, RecordingParser};
pub use model::{ParsedRecording, MEASUREMENT_COLUMN, SAMPLE_INDEX_COLUMN};
