//! Fetch → normalize → metrics, producing a complete [`Snapshot`].

use std::sync::Arc;
use tracing::{info, warn};

use crate::analyzers::metrics::build_record;
use crate::analyzers::types::StudentRecord;
use crate::error::RefreshError;
use crate::parser::{parse_students, parse_task_dump};
use crate::schema::{HEADER_ROWS, SheetSchema};
use crate::services::sheet_source::{SheetRef, SheetSource};
use crate::store::{SheetRows, Snapshot};

pub struct Pipeline {
    source: Arc<dyn SheetSource>,
    schema: SheetSchema,
    student_sheet: SheetRef,
    task_sheet: Option<SheetRef>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn SheetSource>, schema: SheetSchema, student_sheet: SheetRef) -> Self {
        Self {
            source,
            schema,
            student_sheet,
            task_sheet: None,
        }
    }

    pub fn with_task_sheet(mut self, sheet: SheetRef) -> Self {
        self.task_sheet = Some(sheet);
        self
    }

    pub fn schema(&self) -> &SheetSchema {
        &self.schema
    }

    pub fn source_label(&self) -> &'static str {
        self.source.describe()
    }

    /// Builds a new snapshot from the sheets.
    ///
    /// # Errors
    ///
    /// Fails when the student sheet cannot be fetched, does not fit the
    /// schema, or yields no records. The task-dump sheet is optional: a
    /// failure there is logged and leaves the task list empty.
    #[tracing::instrument(skip(self), fields(sheet = %self.student_sheet.title))]
    pub async fn run(&self) -> Result<Snapshot, RefreshError> {
        let grid = self.source.fetch_grid(&self.student_sheet).await?;
        let rows = parse_students(&grid, &self.schema)?;

        let students: Vec<StudentRecord> = rows
            .into_iter()
            .map(|row| build_record(row, &self.schema))
            .collect();
        if students.is_empty() {
            return Err(RefreshError::Empty(self.student_sheet.title.clone()));
        }

        let mut sheet_rows = SheetRows {
            student_performance: grid.len().saturating_sub(HEADER_ROWS),
            task_dump: 0,
        };

        let tasks = match &self.task_sheet {
            Some(sheet) => match self.source.fetch_grid(sheet).await {
                Ok(task_grid) => {
                    sheet_rows.task_dump = task_grid.len().saturating_sub(HEADER_ROWS);
                    parse_task_dump(&task_grid)
                }
                Err(e) => {
                    warn!(sheet = %sheet.title, error = %e, "Task sheet unavailable, continuing without tasks");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        info!(
            students = students.len(),
            tasks = tasks.len(),
            source_rows = sheet_rows.student_performance,
            "Snapshot built"
        );

        Ok(Snapshot::new(students, tasks, sheet_rows))
    }
}
