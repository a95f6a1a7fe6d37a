//! Data types produced by the metrics pipeline.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-task scores keyed by task name, in canonical task order.
///
/// A value of `0.0` means the task was not attempted.
pub type TaskScores = IndexMap<String, f64>;

/// Categorical bucket derived from a student's average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Satisfactory,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Poor,
}

impl PerformanceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "Excellent",
            PerformanceLevel::Good => "Good",
            PerformanceLevel::Satisfactory => "Satisfactory",
            PerformanceLevel::NeedsImprovement => "Needs Improvement",
            PerformanceLevel::Poor => "Poor",
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction of the most recent scores relative to the earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Improving => "Improving",
            Trend::Declining => "Declining",
            Trend::Stable => "Stable",
            Trend::InsufficientData => "Insufficient Data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary statistics over a student's positive task scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub total_tasks: usize,
    pub performance_level: PerformanceLevel,
    pub trend: Trend,
    pub completion_rate: f64,
}

/// A fully computed student entry as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub current_status: String,
    pub performance: TaskScores,
    pub metrics: Metrics,
}

/// One row of the task-assignment sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub user_id: String,
    pub student_name: String,
    pub placement_coach: String,
    pub batch_au: String,
    pub batch_lu: String,
    pub assigned_at: String,
    pub target_id: String,
    pub completed_at: String,
    pub deadline: String,
    pub completion_status: String,
    pub marked_completed_by_assignee: String,
    pub marked_completed_by_assignee_at: String,
    pub title: String,
    pub description: String,
}
