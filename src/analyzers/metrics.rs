use crate::analyzers::grade::performance_level;
use crate::analyzers::trend::trend;
use crate::analyzers::types::{Metrics, StudentRecord, TaskScores};
use crate::analyzers::utility::{mean, pct, round1};
use crate::parser::StudentRow;
use crate::schema::SheetSchema;

/// Computes the [`Metrics`] block for one student's task scores.
///
/// Only scores above zero count as attempted. Scores are visited in the
/// schema's task order, which is what the trend compares over.
pub fn compute_metrics(performance: &TaskScores, schema: &SheetSchema) -> Metrics {
    let positive: Vec<f64> = schema
        .task_names()
        .filter_map(|task| performance.get(task).copied())
        .filter(|score| *score > 0.0)
        .collect();

    let average_score = round1(mean(&positive));
    let highest_score = round1(positive.iter().copied().reduce(f64::max).unwrap_or(0.0));
    let lowest_score = round1(positive.iter().copied().reduce(f64::min).unwrap_or(0.0));

    Metrics {
        average_score,
        highest_score,
        lowest_score,
        total_tasks: positive.len(),
        performance_level: performance_level(average_score),
        trend: trend(&positive),
        completion_rate: round1(pct(positive.len(), schema.task_count())),
    }
}

/// Attaches metrics to a normalized row.
pub fn build_record(row: StudentRow, schema: &SheetSchema) -> StudentRecord {
    let metrics = compute_metrics(&row.performance, schema);
    StudentRecord {
        id: row.id,
        name: row.name,
        current_status: row.current_status,
        performance: row.performance,
        metrics,
    }
}
