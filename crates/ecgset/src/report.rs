use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use ecgset_core::{DatasetSummary, IngestionBatch};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn print_summary(summary: &DatasetSummary) {
    println!("\n--- Dataset Summary ---");
    println!("Total rows: {}", summary.total_rows);

    let mut counts = new_table(vec!["Group", "Rows"]);
    for (cohort, count) in &summary.cohort_counts {
        counts.add_row(vec![cohort.clone(), count.to_string()]);
    }
    println!("{counts}");

    println!("Columns: {}", summary.columns.join(", "));

    if summary.preview.is_empty() {
        return;
    }
    let mut preview = new_table(vec!["filename", "group", "num_samples"]);
    for row in &summary.preview {
        preview.add_row(vec![
            row.filename.clone(),
            row.group.clone(),
            row.num_samples.to_string(),
        ]);
    }
    println!("{preview}");
}

pub fn print_skipped(batch: &IngestionBatch) {
    for cohort in batch.missing_cohorts() {
        println!("Cohort folder '{cohort}' was not found");
    }
    for (cohort, reason) in batch.unlisted_cohorts() {
        println!("Cohort folder '{cohort}' could not be listed: {reason}");
    }
    if batch.failed_count() == 0 {
        return;
    }

    let mut table = new_table(vec!["Skipped file", "Group", "Reason"]);
    for (source, err) in batch.failures() {
        table.add_row(vec![
            source.path.display().to_string(),
            source.cohort.clone(),
            err.to_string(),
        ]);
    }
    println!("\n--- Skipped Files ({}) ---", batch.failed_count());
    println!("{table}");
}

pub fn print_lead_lengths(lengths: &[(String, Option<usize>)]) {
    let mut table = new_table(vec!["Lead", "Samples in first record"]);
    for (lead, length) in lengths {
        let cell = length.map_or_else(|| "-".to_string(), |len| len.to_string());
        table.add_row(vec![lead.clone(), cell]);
    }
    println!("{table}");
}
