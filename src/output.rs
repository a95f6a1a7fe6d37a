//! Export of computed student records.
//!
//! Supports pretty JSON and a flat CSV with one column per task.

use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use tracing::debug;

use crate::analyzers::types::StudentRecord;
use crate::schema::SheetSchema;

/// Writes records as pretty-printed JSON to `path`.
pub fn write_json(path: &str, records: &[StudentRecord]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    debug!(path, records = records.len(), "JSON export written");
    Ok(())
}

/// Header row of the CSV export: identity, one column per task, then metrics.
pub fn csv_header(schema: &SheetSchema) -> Vec<String> {
    let mut header: Vec<String> = ["id", "name", "current_status"]
        .into_iter()
        .map(str::to_string)
        .collect();
    header.extend(schema.task_names().map(str::to_string));
    header.extend(
        [
            "average_score",
            "highest_score",
            "lowest_score",
            "total_tasks",
            "performance_level",
            "trend",
            "completion_rate",
        ]
        .into_iter()
        .map(str::to_string),
    );
    header
}

fn csv_row(record: &StudentRecord, schema: &SheetSchema) -> Vec<String> {
    let mut row = vec![
        record.id.clone(),
        record.name.clone(),
        record.current_status.clone(),
    ];
    row.extend(
        schema
            .task_names()
            .map(|task| record.performance.get(task).copied().unwrap_or(0.0).to_string()),
    );

    let m = &record.metrics;
    row.extend([
        m.average_score.to_string(),
        m.highest_score.to_string(),
        m.lowest_score.to_string(),
        m.total_tasks.to_string(),
        m.performance_level.to_string(),
        m.trend.to_string(),
        m.completion_rate.to_string(),
    ]);
    row
}

/// Writes records as CSV to `path`, replacing any existing file.
pub fn write_csv(path: &str, records: &[StudentRecord], schema: &SheetSchema) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(csv_header(schema))?;
    for record in records {
        writer.write_record(csv_row(record, schema))?;
    }
    writer.flush()?;

    debug!(path, records = records.len(), "CSV export written");
    Ok(())
}
