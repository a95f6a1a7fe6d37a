use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::analyzers::grade::performance_level;
use crate::analyzers::types::{PerformanceLevel, StudentRecord, TaskAssignment};
use crate::api::error::ServiceError;
use crate::pipeline::Pipeline;
use crate::store::{RecordStore, SheetRows};

/// Performance bucket selected by `/api/filter`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelFilter {
    #[default]
    All,
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    Poor,
}

impl LevelFilter {
    /// Whether a record with this average score falls in the bucket.
    pub fn matches(&self, average_score: f64) -> bool {
        let level = performance_level(average_score);
        match self {
            LevelFilter::All => true,
            LevelFilter::Excellent => level == PerformanceLevel::Excellent,
            LevelFilter::Good => level == PerformanceLevel::Good,
            LevelFilter::Satisfactory => level == PerformanceLevel::Satisfactory,
            LevelFilter::NeedsImprovement => level == PerformanceLevel::NeedsImprovement,
            LevelFilter::Poor => level == PerformanceLevel::Poor,
        }
    }
}

fn default_min_score() -> f64 {
    0.0
}

fn default_max_score() -> f64 {
    100.0
}

/// Level bucket and inclusive average-score range, applied together.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub level: LevelFilter,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_max_score")]
    pub max_score: f64,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            level: LevelFilter::All,
            min_score: default_min_score(),
            max_score: default_max_score(),
        }
    }
}

impl FilterQuery {
    pub fn matches(&self, record: &StudentRecord) -> bool {
        let avg = record.metrics.average_score;
        self.level.matches(avg) && self.min_score <= avg && avg <= self.max_score
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub status: &'static str,
    pub message: String,
    pub students_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    NoData,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub data_source: &'static str,
    pub total_students: usize,
    pub tasks: Vec<String>,
    pub sheets_loaded: SheetRows,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Read/filter operations over the store plus the refresh trigger.
pub struct QueryService {
    store: Arc<dyn RecordStore>,
    pipeline: Pipeline,
    refresh_lock: Mutex<()>,
}

impl QueryService {
    pub fn new(store: Arc<dyn RecordStore>, pipeline: Pipeline) -> Self {
        Self {
            store,
            pipeline,
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<StudentRecord>, ServiceError> {
        let snapshot = self.store.current().await;
        if snapshot.is_empty() {
            return Err(ServiceError::NoData("student"));
        }
        Ok(snapshot.students.clone())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<StudentRecord, ServiceError> {
        let snapshot = self.store.current().await;
        if snapshot.is_empty() {
            return Err(ServiceError::NoData("student"));
        }
        snapshot
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Records matching `query`, in sheet order. An empty store yields none.
    pub async fn filter(&self, query: &FilterQuery) -> Vec<StudentRecord> {
        let snapshot = self.store.current().await;
        snapshot
            .students
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect()
    }

    pub async fn tasks(&self) -> Result<Vec<TaskAssignment>, ServiceError> {
        let snapshot = self.store.current().await;
        if snapshot.tasks.is_empty() {
            return Err(ServiceError::NoData("tasks"));
        }
        Ok(snapshot.tasks.clone())
    }

    pub fn task_names(&self) -> Vec<String> {
        self.pipeline
            .schema()
            .task_names()
            .map(str::to_string)
            .collect()
    }

    /// Re-runs the pipeline and swaps the store on success.
    ///
    /// Refreshes are serialised. On failure the previous snapshot stays.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshSummary, ServiceError> {
        let _guard = self.refresh_lock.lock().await;

        let snapshot = match self.pipeline.run().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Refresh failed, keeping previous data");
                return Err(e.into());
            }
        };

        let count = snapshot.len();
        self.store.replace(snapshot).await;
        info!(students = count, "Store refreshed");

        Ok(RefreshSummary {
            status: "success",
            message: format!("Refreshed {count} students from Google Sheets"),
            students_count: count,
        })
    }

    pub async fn health(&self) -> Health {
        let snapshot = self.store.current().await;
        Health {
            status: if snapshot.is_empty() {
                HealthStatus::NoData
            } else {
                HealthStatus::Healthy
            },
            timestamp: Utc::now(),
            data_source: self.pipeline.source_label(),
            total_students: snapshot.len(),
            tasks: self.task_names(),
            sheets_loaded: snapshot.sheet_rows,
            last_refresh: snapshot.loaded_at,
        }
    }
}
