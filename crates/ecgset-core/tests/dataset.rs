mod common;

use std::path::PathBuf;

use ecgset_core::dataset::{lead_field_union, row_lead_lengths};
use ecgset_core::{
    assemble_dataset, cohort_counts, ingest_cohorts, summarize_dataset, LeadSeries,
    NormalizedRecord, PipelineConfig, SourceFile,
};
use polars::prelude::DataType;
use tempfile::tempdir;

use common::{column_names, float_cell, index_cell, text_cell, write_two_cohort_example};

fn record(cohort: &str, name: &str, leads: Vec<(&str, Vec<f64>)>, samples: &[i64]) -> NormalizedRecord {
    NormalizedRecord {
        source: SourceFile::new(PathBuf::from(format!("/data/{cohort}/{name}")), cohort),
        num_samples: samples.len(),
        leads: leads
            .into_iter()
            .map(|(column, values)| LeadSeries {
                column: column.to_string(),
                field: format!("timeseries_{column}"),
                values: values.into_iter().map(Some).collect(),
            })
            .collect(),
        sample_numbers: samples.to_vec(),
    }
}

fn cohorts() -> Vec<String> {
    PipelineConfig::default().cohorts
}

#[test]
fn two_cohort_example_assembles_expected_rows() {
    let dir = tempdir().unwrap();
    write_two_cohort_example(dir.path());

    let batch = ingest_cohorts(&PipelineConfig::default().with_base_path(dir.path()));
    let df = assemble_dataset(&batch.records()).expect("assembly failed");

    assert_eq!(df.height(), 2);
    assert_eq!(
        column_names(&df),
        vec![
            "filename",
            "filepath",
            "group",
            "num_samples",
            "timeseries_I",
            "timeseries_II",
            "sample_numbers"
        ]
    );

    assert_eq!(text_cell(&df, "filename", 0), "a.csv");
    assert_eq!(text_cell(&df, "group", 0), "control");
    assert_eq!(df.column("num_samples").unwrap().u64().unwrap().get(0), Some(2));
    assert_eq!(float_cell(&df, "timeseries_I", 0), Some(vec![Some(0.1), Some(0.2)]));
    assert_eq!(float_cell(&df, "timeseries_II", 0), None);
    assert_eq!(index_cell(&df, 0), vec![1, 2]);

    assert_eq!(text_cell(&df, "filename", 1), "b.csv");
    assert_eq!(text_cell(&df, "group", 1), "Amyloidosis");
    assert_eq!(df.column("num_samples").unwrap().u64().unwrap().get(1), Some(1));
    assert_eq!(float_cell(&df, "timeseries_I", 1), Some(vec![Some(0.5)]));
    assert_eq!(float_cell(&df, "timeseries_II", 1), Some(vec![Some(0.6)]));
    assert_eq!(index_cell(&df, 1), vec![1]);

    assert_eq!(df.column("timeseries_II").unwrap().null_count(), 1);
}

#[test]
fn lead_union_keeps_first_seen_order() {
    let a = record("control", "a.csv", vec![("II", vec![1.0]), ("I", vec![2.0])], &[1]);
    let b = record("control", "b.csv", vec![("I", vec![3.0]), ("V1", vec![4.0])], &[1]);

    assert_eq!(
        lead_field_union(&[&a, &b]),
        vec!["timeseries_II", "timeseries_I", "timeseries_V1"]
    );
}

#[test]
fn sequences_are_not_padded() {
    let short = record("control", "short.csv", vec![("I", vec![0.1])], &[1]);
    let long = record(
        "Amyloidosis",
        "long.csv",
        vec![("I", vec![0.1, 0.2, 0.3])],
        &[1, 2, 3],
    );

    let df = assemble_dataset(&[&short, &long]).unwrap();

    assert_eq!(float_cell(&df, "timeseries_I", 0).unwrap().len(), 1);
    assert_eq!(float_cell(&df, "timeseries_I", 1).unwrap().len(), 3);
    assert_eq!(index_cell(&df, 1), vec![1, 2, 3]);
}

#[test]
fn empty_record_set_keeps_identity_schema() {
    let df = assemble_dataset(&[]).unwrap();

    assert_eq!(df.height(), 0);
    assert_eq!(
        column_names(&df),
        vec!["filename", "filepath", "group", "num_samples", "sample_numbers"]
    );
    assert_eq!(
        df.column("sample_numbers").unwrap().dtype(),
        &DataType::List(Box::new(DataType::Int64))
    );
}

#[test]
fn record_without_leads_still_has_row() {
    let index_only = record("control", "index.csv", vec![], &[1, 2, 3, 4]);
    let with_lead = record("control", "lead.csv", vec![("I", vec![0.5])], &[1]);

    let df = assemble_dataset(&[&index_only, &with_lead]).unwrap();

    assert_eq!(df.height(), 2);
    assert_eq!(df.column("num_samples").unwrap().u64().unwrap().get(0), Some(4));
    assert_eq!(float_cell(&df, "timeseries_I", 0), None);
    assert_eq!(
        df.column("timeseries_I").unwrap().dtype(),
        &DataType::List(Box::new(DataType::Float64))
    );
}

#[test]
fn cohort_counts_follow_configured_order() {
    let records = [
        record("Amyloidosis", "x.csv", vec![], &[1]),
        record("control", "y.csv", vec![], &[1]),
        record("Amyloidosis", "z.csv", vec![], &[1]),
    ];
    let refs: Vec<&NormalizedRecord> = records.iter().collect();
    let df = assemble_dataset(&refs).unwrap();

    let counts = cohort_counts(&df, &cohorts()).unwrap();

    assert_eq!(
        counts,
        vec![("control".to_string(), 1), ("Amyloidosis".to_string(), 2)]
    );
}

#[test]
fn summary_reports_missing_cohort_as_zero() {
    let records = [record("control", "only.csv", vec![("I", vec![1.0, 2.0])], &[1, 2])];
    let refs: Vec<&NormalizedRecord> = records.iter().collect();
    let df = assemble_dataset(&refs).unwrap();

    let summary = summarize_dataset(&df, &cohorts(), 5).unwrap();

    assert_eq!(summary.total_rows, 1);
    assert_eq!(summary.count_for("control"), 1);
    assert_eq!(summary.count_for("Amyloidosis"), 0);
    assert_eq!(summary.preview.len(), 1);
    assert_eq!(summary.preview[0].filename, "only.csv");
    assert_eq!(summary.preview[0].num_samples, 2);
    assert!(summary.columns.contains(&"timeseries_I".to_string()));
}

#[test]
fn row_lead_lengths_mark_absent_leads() {
    let a = record("control", "a.csv", vec![("I", vec![0.1, 0.2])], &[1, 2]);
    let b = record("control", "b.csv", vec![("I", vec![0.5]), ("II", vec![0.6])], &[1]);
    let df = assemble_dataset(&[&a, &b]).unwrap();

    let lengths = row_lead_lengths(&df, 0, "timeseries_").unwrap();

    assert_eq!(
        lengths,
        vec![
            ("timeseries_I".to_string(), Some(2)),
            ("timeseries_II".to_string(), None)
        ]
    );
}
