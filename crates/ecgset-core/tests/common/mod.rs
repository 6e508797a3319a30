#![allow(dead_code)]

use std::fs;
use std::path::Path;

use polars::prelude::DataFrame;

/// Writes a tab-separated recording from header and row cells.
pub fn write_recording(dir: &Path, name: &str, header: &[&str], rows: &[&[&str]]) {
    fs::create_dir_all(dir).expect("create cohort dir");
    let mut content = header.join("\t");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join("\t"));
        content.push('\n');
    }
    fs::write(dir.join(name), content).expect("write recording");
}

/// Lays out the two-cohort example used across the suite:
/// `control/a.csv` with lead I and `Amyloidosis/b.csv` with leads I and II.
pub fn write_two_cohort_example(base: &Path) {
    write_recording(
        &base.join("control"),
        "a.csv",
        &["samplenr", "measurement", "I"],
        &[&["1", "", "0.1"], &["2", "", "0.2"]],
    );
    write_recording(
        &base.join("Amyloidosis"),
        "b.csv",
        &["samplenr", "I", "II"],
        &[&["1", "0.5", "0.6"]],
    );
}

pub fn float_cell(df: &DataFrame, column: &str, row: usize) -> Option<Vec<Option<f64>>> {
    let list = df
        .column(column)
        .unwrap_or_else(|err| panic!("missing column {column}: {err}"))
        .list()
        .expect("list column");
    list.get_as_series(row)
        .map(|series| series.f64().expect("f64 list").into_iter().collect())
}

pub fn index_cell(df: &DataFrame, row: usize) -> Vec<i64> {
    df.column("sample_numbers")
        .expect("sample_numbers column")
        .list()
        .expect("list column")
        .get_as_series(row)
        .expect("sample_numbers is never null")
        .i64()
        .expect("i64 list")
        .into_no_null_iter()
        .collect()
}

pub fn text_cell(df: &DataFrame, column: &str, row: usize) -> String {
    df.column(column)
        .unwrap_or_else(|err| panic!("missing column {column}: {err}"))
        .str()
        .expect("text column")
        .get(row)
        .unwrap_or_default()
        .to_string()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}
