//! Record store holding the current student snapshot.
//!
//! A refresh builds a complete [`Snapshot`] off to the side and then swaps
//! it in under a short write lock, so readers see either the old record
//! set or the new one. When a snapshot path is configured, each swap is
//! also written to disk as JSON and can be reloaded at start-up.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::analyzers::types::{StudentRecord, TaskAssignment};

/// Data-row counts of the sheets a snapshot was built from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRows {
    pub student_performance: usize,
    pub task_dump: usize,
}

/// An immutable, fully built record set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub loaded_at: Option<DateTime<Utc>>,
    pub sheet_rows: SheetRows,
    pub students: Vec<StudentRecord>,
    pub tasks: Vec<TaskAssignment>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Builds a snapshot, keeping the first record for each student id.
    pub fn new(
        students: Vec<StudentRecord>,
        tasks: Vec<TaskAssignment>,
        sheet_rows: SheetRows,
    ) -> Self {
        Self {
            loaded_at: Some(Utc::now()),
            sheet_rows,
            students,
            tasks,
            index: HashMap::new(),
        }
        .reindex()
    }

    fn reindex(mut self) -> Self {
        let mut index = HashMap::with_capacity(self.students.len());
        let mut kept = Vec::with_capacity(self.students.len());

        for record in self.students.drain(..) {
            if index.contains_key(&record.id) {
                warn!(id = %record.id, name = %record.name, "Dropping duplicate student id");
                continue;
            }
            index.insert(record.id.clone(), kept.len());
            kept.push(record);
        }

        self.students = kept;
        self.index = index;
        self
    }

    pub fn get(&self, id: &str) -> Option<&StudentRecord> {
        self.index.get(id).map(|&i| &self.students[i])
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Reads a snapshot previously written by [`Snapshot::save`].
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read snapshot '{}'", path.display()))?;
        let snapshot: Snapshot = serde_json::from_slice(&content)
            .with_context(|| format!("failed to parse snapshot '{}'", path.display()))?;
        Ok(snapshot.reindex())
    }

    /// Writes the snapshot as JSON via a temporary file and rename.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("failed to write snapshot '{}'", tmp.display()))?;
        tokio::fs::rename(&tmp, path).await?;

        Ok(())
    }
}

/// Keyed storage for computed student records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the current snapshot. Cheap; readers hold it as long as they like.
    async fn current(&self) -> Arc<Snapshot>;

    /// Replaces the whole record set.
    async fn replace(&self, snapshot: Snapshot);
}

/// In-memory store with optional JSON persistence.
#[derive(Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
    persist_path: Option<PathBuf>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persistence(path: impl Into<PathBuf>) -> Self {
        Self {
            current: RwLock::default(),
            persist_path: Some(path.into()),
        }
    }

    /// Seeds the store from the persisted snapshot, if there is one.
    pub async fn restore(&self) -> Result<bool> {
        let Some(path) = &self.persist_path else {
            return Ok(false);
        };
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(false);
        }

        let snapshot = Snapshot::load(path).await?;
        info!(
            path = %path.display(),
            students = snapshot.len(),
            "Restored persisted snapshot"
        );
        *self.current.write().await = Arc::new(snapshot);
        Ok(true)
    }
}

#[async_trait]
impl RecordStore for SnapshotStore {
    async fn current(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    async fn replace(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = snapshot.clone();

        if let Some(path) = &self.persist_path {
            if let Err(e) = snapshot.save(path).await {
                warn!(path = %path.display(), error = %e, "Failed to persist snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::metrics::compute_metrics;
    use crate::analyzers::types::TaskScores;
    use crate::schema::SheetSchema;
    use std::env;

    fn record(id: &str, name: &str) -> StudentRecord {
        let performance: TaskScores = [("SQL".to_string(), 88.0)].into_iter().collect();
        StudentRecord {
            id: id.to_string(),
            name: name.to_string(),
            current_status: "Active".to_string(),
            metrics: compute_metrics(&performance, &SheetSchema::default()),
            performance,
        }
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = Snapshot::new(
            vec![record("S1", "Alice"), record("S2", "Bob")],
            vec![],
            SheetRows::default(),
        );
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("S2").unwrap().name, "Bob");
        assert!(snapshot.get("S3").is_none());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let snapshot = Snapshot::new(
            vec![record("S1", "Alice"), record("S1", "Impostor")],
            vec![],
            SheetRows::default(),
        );
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("S1").unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn test_store_starts_empty() {
        let store = SnapshotStore::new();
        assert!(store.current().await.is_empty());
        assert!(!store.restore().await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_swaps_whole_set() {
        let store = SnapshotStore::new();
        store
            .replace(Snapshot::new(vec![record("S1", "Alice")], vec![], SheetRows::default()))
            .await;
        let before = store.current().await;

        store
            .replace(Snapshot::new(vec![record("S2", "Bob")], vec![], SheetRows::default()))
            .await;
        let after = store.current().await;

        assert!(before.get("S1").is_some());
        assert!(after.get("S1").is_none());
        assert!(after.get("S2").is_some());
    }

    #[tokio::test]
    async fn test_persisted_snapshot_round_trip() {
        let path = env::temp_dir().join("cohort_dashboard_test_snapshot.json");
        let _ = std::fs::remove_file(&path);

        let store = SnapshotStore::with_persistence(&path);
        store
            .replace(Snapshot::new(
                vec![record("S1", "Alice")],
                vec![],
                SheetRows {
                    student_performance: 1,
                    task_dump: 0,
                },
            ))
            .await;

        let restored = SnapshotStore::with_persistence(&path);
        assert!(restored.restore().await.unwrap());
        let snapshot = restored.current().await;
        assert_eq!(snapshot.get("S1").unwrap().name, "Alice");
        assert_eq!(snapshot.sheet_rows.student_performance, 1);

        std::fs::remove_file(&path).unwrap();
    }
}
