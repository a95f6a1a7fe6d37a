//! Normalizer for raw sheet grids.
//!
//! Turns the positional cells of the student sheet into [`StudentRow`]s and
//! the task-dump sheet into [`TaskAssignment`]s. Incomplete rows are
//! filtered out here; they are a data-quality issue, not an error.

use tracing::debug;

use crate::analyzers::types::{TaskAssignment, TaskScores};
use crate::error::ConfigurationError;
use crate::schema::{HEADER_ROWS, SheetSchema};
use crate::services::sheet_source::RawRow;

/// Cell values the sheet uses for "not applicable".
const NOT_APPLICABLE: &[&str] = &["#N/A", "nan", "None"];

/// A normalized student row before metrics are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub current_status: String,
    pub performance: TaskScores,
}

/// Coerces a score cell into a number, falling back to 0.0.
///
/// A cell is numeric when, after removing at most one `.` and one `-`,
/// only ASCII digits remain. Negative values are clamped to 0.0, and digit
/// runs too long to fit an `f64` count as invalid.
pub fn parse_score(cell: &str) -> f64 {
    let text = cell.trim();
    if text.is_empty() || NOT_APPLICABLE.contains(&text) || !is_numeric_text(text) {
        return 0.0;
    }

    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map_or(0.0, |v| v.max(0.0))
}

fn is_numeric_text(text: &str) -> bool {
    let stripped = text.replacen('.', "", 1).replacen('-', "", 1);
    !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit())
}

/// Normalizes every data row of the student sheet.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when the grid lacks header rows or the
/// fixed id/name/status columns fall outside the header. No rows are
/// returned in that case.
pub fn parse_students(
    grid: &[RawRow],
    schema: &SheetSchema,
) -> Result<Vec<StudentRow>, ConfigurationError> {
    schema.check_header(grid)?;

    let mut students = Vec::new();
    for (index, row) in grid.iter().enumerate().skip(HEADER_ROWS) {
        match parse_student_row(row, schema) {
            Some(student) => students.push(student),
            None => debug!(row = index + 1, "Skipping incomplete student row"),
        }
    }

    Ok(students)
}

/// Normalizes one data row, or `None` when its id or name is missing.
pub fn parse_student_row(row: &RawRow, schema: &SheetSchema) -> Option<StudentRow> {
    let id = row.get(schema.id_column)?.replace(',', "").trim().to_string();
    let name = row.get(schema.name_column)?.trim().to_string();
    if id.is_empty() || name.is_empty() {
        return None;
    }

    let current_status = row
        .get(schema.status_column)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| schema.status_placeholder.clone());

    let performance = schema
        .tasks
        .iter()
        .map(|task| {
            let score = row.get(task.column).map_or(0.0, |cell| parse_score(cell));
            (task.name.clone(), score)
        })
        .collect();

    Some(StudentRow {
        id,
        name,
        current_status,
        performance,
    })
}

/// Reads the task-dump sheet by fixed position, dropping blank rows.
pub fn parse_task_dump(grid: &[RawRow]) -> Vec<TaskAssignment> {
    grid.iter()
        .skip(HEADER_ROWS)
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            let at = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
            TaskAssignment {
                user_id: at(0),
                student_name: at(1),
                placement_coach: at(2),
                batch_au: at(3),
                batch_lu: at(4),
                assigned_at: at(5),
                target_id: at(6),
                completed_at: at(7),
                deadline: at(8),
                completion_status: at(9),
                marked_completed_by_assignee: at(10),
                marked_completed_by_assignee_at: at(11),
                title: at(12),
                description: at(13),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn grid_with(rows: Vec<RawRow>) -> Vec<RawRow> {
        let mut grid = vec![
            row(&["Cohort 7"]),
            row(&[
                "ID", "Name", "Batch", "Coach", "Spreadsheet", "SQL", "Power BI", "Python", "EDA",
                "ML", "Status",
            ]),
        ];
        grid.extend(rows);
        grid
    }

    #[test]
    fn test_parse_score_markers() {
        assert_eq!(parse_score("#N/A"), 0.0);
        assert_eq!(parse_score(""), 0.0);
        assert_eq!(parse_score("  "), 0.0);
        assert_eq!(parse_score("nan"), 0.0);
        assert_eq!(parse_score("None"), 0.0);
        assert_eq!(parse_score("abc"), 0.0);
    }

    #[test]
    fn test_parse_score_numbers() {
        assert_eq!(parse_score("85"), 85.0);
        assert_eq!(parse_score(" 72.5 "), 72.5);
        assert_eq!(parse_score(".5"), 0.5);
    }

    #[test]
    fn test_parse_score_rejects_repeated_separators() {
        assert_eq!(parse_score("1.2.3"), 0.0);
        assert_eq!(parse_score("--5"), 0.0);
        assert_eq!(parse_score("."), 0.0);
        assert_eq!(parse_score("5-"), 0.0);
    }

    #[test]
    fn test_parse_score_clamps_negative() {
        assert_eq!(parse_score("-5"), 0.0);
    }

    #[test]
    fn test_parse_score_rejects_overflowing_digits() {
        let huge = "9".repeat(400);
        assert_eq!(parse_score(&huge), 0.0);
        assert_eq!(parse_score(&format!("{huge}.5")), 0.0);

        let schema = SheetSchema::default();
        let student =
            parse_student_row(&row(&["S5", "Finn", "", "", huge.as_str(), "80"]), &schema).unwrap();
        assert_eq!(student.performance["Spreadsheet"], 0.0);
        assert!(student.performance.values().all(|v| v.is_finite()));
    }

    #[test]
    fn test_scenario_row() {
        let schema = SheetSchema::default();
        let grid = grid_with(vec![row(&[
            "S1", "Alice", "", "", "", "85", "90", "#N/A", "70", "60", "Active",
        ])]);

        let students = parse_students(&grid, &schema).unwrap();
        assert_eq!(students.len(), 1);

        let alice = &students[0];
        assert_eq!(alice.id, "S1");
        assert_eq!(alice.current_status, "Active");
        let scores: Vec<(&str, f64)> = alice
            .performance
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("Spreadsheet", 0.0),
                ("SQL", 85.0),
                ("Power BI", 90.0),
                ("Python", 0.0),
                ("EDA", 70.0),
                ("ML", 60.0),
            ]
        );
    }

    #[test]
    fn test_id_strips_commas_and_whitespace() {
        let schema = SheetSchema::default();
        let student = parse_student_row(&row(&[" 1,024 ", "  Bob "]), &schema).unwrap();
        assert_eq!(student.id, "1024");
        assert_eq!(student.name, "Bob");
    }

    #[test]
    fn test_short_row_defaults() {
        let schema = SheetSchema::default();
        let student = parse_student_row(&row(&["S2", "Carol", "", "", "95"]), &schema).unwrap();
        assert_eq!(student.current_status, "N/A");
        assert_eq!(student.performance.len(), 6);
        assert_eq!(student.performance["Spreadsheet"], 95.0);
        assert_eq!(student.performance["ML"], 0.0);
    }

    #[test]
    fn test_blank_status_cell_gets_placeholder() {
        let schema = SheetSchema::default();
        let cells = ["S3", "Dana", "", "", "70", "70", "70", "70", "70", "70", "   "];
        let student = parse_student_row(&row(&cells), &schema).unwrap();
        assert_eq!(student.current_status, "N/A");

        let padded = parse_student_row(&row(&cells[..10]), &schema).unwrap();
        assert_eq!(student.current_status, padded.current_status);
    }

    #[test]
    fn test_placeholder_is_configurable() {
        let schema = SheetSchema::default().with_status_placeholder("Active");
        let student = parse_student_row(&row(&["S2", "Carol"]), &schema).unwrap();
        assert_eq!(student.current_status, "Active");
    }

    #[test]
    fn test_incomplete_rows_are_skipped() {
        let schema = SheetSchema::default();
        let grid = grid_with(vec![
            row(&[]),
            row(&["S1"]),
            row(&["", "Nameless"]),
            row(&["S3", "   "]),
            row(&[",", "Comma"]),
            row(&["S4", "Dana"]),
        ]);

        let students = parse_students(&grid, &schema).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, "S4");
        assert!(students.len() <= grid.len() - HEADER_ROWS);
    }

    #[test]
    fn test_task_order_follows_schema_not_columns() {
        let mut schema = SheetSchema::default();
        schema.tasks.reverse();
        let student =
            parse_student_row(&row(&["S1", "A", "", "", "1", "2", "3", "4", "5", "6"]), &schema)
                .unwrap();
        let names: Vec<&str> = student.performance.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["ML", "EDA", "Python", "Power BI", "SQL", "Spreadsheet"]);
        assert_eq!(student.performance["ML"], 6.0);
    }

    #[test]
    fn test_configuration_error_yields_nothing() {
        let schema = SheetSchema::default();
        let grid = vec![row(&["title"]), row(&["ID", "Name"]), row(&["S1", "Alice"])];
        assert_eq!(
            parse_students(&grid, &schema),
            Err(ConfigurationError::ColumnOutOfBounds {
                field: "status",
                position: 10,
                width: 2
            })
        );
    }

    #[test]
    fn test_parse_task_dump() {
        let grid = vec![
            row(&["Task dump"]),
            row(&["user_id", "student_name"]),
            row(&["u1", "Alice", "Coach K", "AU1", "LU1", "2024-01-01", "t9"]),
            row(&["", "  ", ""]),
        ];

        let tasks = parse_task_dump(&grid);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].placement_coach, "Coach K");
        assert_eq!(tasks[0].target_id, "t9");
        assert_eq!(tasks[0].description, "");
    }
}
