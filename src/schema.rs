//! Fixed-position layout of the student performance sheet.
//!
//! The schema is an immutable value handed to the normalizer and the
//! metrics calculator. It can be overridden from a JSON file:
//! ```json
//! {
//!   "id_column": 0,
//!   "name_column": 1,
//!   "status_column": 10,
//!   "status_placeholder": "N/A",
//!   "tasks": [
//!     { "name": "Spreadsheet", "column": 4 },
//!     { "name": "SQL", "column": 5 }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ConfigurationError;
use crate::services::sheet_source::RawRow;

/// Rows at the top of every sheet that carry header metadata.
pub const HEADER_ROWS: usize = 2;

/// A scored task and the column it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskColumn {
    pub name: String,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSchema {
    pub id_column: usize,
    pub name_column: usize,
    pub status_column: usize,
    /// Written to `current_status` when the status cell is absent.
    #[serde(default = "default_status_placeholder")]
    pub status_placeholder: String,
    /// Tasks in canonical order.
    pub tasks: Vec<TaskColumn>,
}

fn default_status_placeholder() -> String {
    "N/A".to_string()
}

impl Default for SheetSchema {
    fn default() -> Self {
        let tasks = [
            ("Spreadsheet", 4),
            ("SQL", 5),
            ("Power BI", 6),
            ("Python", 7),
            ("EDA", 8),
            ("ML", 9),
        ]
        .into_iter()
        .map(|(name, column)| TaskColumn {
            name: name.to_string(),
            column,
        })
        .collect();

        Self {
            id_column: 0,
            name_column: 1,
            status_column: 10,
            status_placeholder: default_status_placeholder(),
            tasks,
        }
    }
}

impl SheetSchema {
    /// Loads a schema from a JSON file at `path` and validates it.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read sheet schema '{path}'"))?;
        let schema: SheetSchema = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse sheet schema '{path}'"))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn with_status_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.status_placeholder = placeholder.into();
        self
    }

    /// Rejects schemas with no tasks or with a task listed twice.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.tasks.is_empty() {
            return Err(ConfigurationError::EmptyTaskSet);
        }

        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.name.as_str()) {
                return Err(ConfigurationError::DuplicateTask(task.name.clone()));
            }
        }

        Ok(())
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|t| t.name.as_str())
    }

    /// Checks the fixed id/name/status positions against the last header row.
    pub fn check_header(&self, grid: &[RawRow]) -> Result<(), ConfigurationError> {
        if grid.len() < HEADER_ROWS {
            return Err(ConfigurationError::MissingHeaderRows {
                found: grid.len(),
                expected: HEADER_ROWS,
            });
        }

        let header = &grid[HEADER_ROWS - 1];
        for (field, position) in [
            ("id", self.id_column),
            ("name", self.name_column),
            ("status", self.status_column),
        ] {
            if position >= header.len() {
                return Err(ConfigurationError::ColumnOutOfBounds {
                    field,
                    position,
                    width: header.len(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn header(width: usize) -> RawRow {
        (0..width).map(|i| format!("col{i}")).collect()
    }

    #[test]
    fn test_default_task_order() {
        let schema = SheetSchema::default();
        let names: Vec<_> = schema.task_names().collect();
        assert_eq!(
            names,
            vec!["Spreadsheet", "SQL", "Power BI", "Python", "EDA", "ML"]
        );
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_check_header_needs_two_rows() {
        let schema = SheetSchema::default();
        let err = schema.check_header(&[header(11)]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingHeaderRows {
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_check_header_status_out_of_bounds() {
        let schema = SheetSchema::default();
        let err = schema
            .check_header(&[vec![], header(10)])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::ColumnOutOfBounds {
                field: "status",
                position: 10,
                width: 10
            }
        );
    }

    #[test]
    fn test_check_header_accepts_wide_header() {
        let schema = SheetSchema::default();
        assert!(schema.check_header(&[vec![], header(14)]).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut schema = SheetSchema::default();
        schema.tasks.push(TaskColumn {
            name: "SQL".to_string(),
            column: 12,
        });
        assert_eq!(
            schema.validate(),
            Err(ConfigurationError::DuplicateTask("SQL".to_string()))
        );
    }

    #[test]
    fn test_load_from_file() {
        let path = format!("{}/cohort_dashboard_schema.json", env::temp_dir().display());
        fs::write(
            &path,
            r#"{"id_column":0,"name_column":1,"status_column":3,
                "tasks":[{"name":"Quiz","column":2}]}"#,
        )
        .unwrap();

        let schema = SheetSchema::load(&path).unwrap();
        assert_eq!(schema.status_placeholder, "N/A");
        assert_eq!(schema.task_count(), 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_empty_task_set() {
        let path = format!("{}/cohort_dashboard_schema_empty.json", env::temp_dir().display());
        fs::write(
            &path,
            r#"{"id_column":0,"name_column":1,"status_column":3,"tasks":[]}"#,
        )
        .unwrap();

        assert!(SheetSchema::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
