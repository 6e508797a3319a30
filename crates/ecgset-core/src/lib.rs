pub mod archive;
pub mod config;
pub mod dataset;
pub mod error;
pub mod ingestion;
pub mod normalize;

pub use archive::{load, persist, read_dataset, write_dataset};
pub use config::PipelineConfig;
pub use dataset::{assemble_dataset, cohort_counts, summarize_dataset, DatasetSummary};
pub use ingestion::{ingest_cohorts, FileOutcome, IngestionBatch, SourceFile};
pub use normalize::{LeadSeries, NormalizedRecord};
