use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::build_url;
use crate::error::FetchError;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::services::sheet_source::{RawRow, SheetRef, SheetSource};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads sheets through `GET /v4/spreadsheets/{id}/values/{title}`.
///
/// Authentication is the job of the wrapped client (see [`crate::fetch::auth`]).
pub struct ValuesApiSource {
    client: Box<dyn HttpClient>,
    base_url: String,
    spreadsheet_id: String,
}

impl ValuesApiSource {
    pub fn new(client: Box<dyn HttpClient>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client,
            base_url: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SheetSource for ValuesApiSource {
    #[tracing::instrument(skip(self, sheet), fields(sheet = %sheet.title))]
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<Vec<RawRow>, FetchError> {
        let url = build_url(
            &self.base_url,
            &["v4", "spreadsheets", &self.spreadsheet_id, "values", &sheet.title],
        )?;

        let bytes = fetch_bytes(self.client.as_ref(), url.as_str()).await?;
        let grid = parse_value_range(&sheet.title, &bytes)?;

        info!(rows = grid.len(), "Sheet loaded via values API");
        Ok(grid)
    }

    fn describe(&self) -> &'static str {
        "Google Sheets values API"
    }
}

/// Decodes a `ValueRange` JSON body into text rows.
///
/// Missing `values` means an empty sheet. Non-string cells are rendered
/// as their JSON text, `null` as an empty cell.
pub fn parse_value_range(sheet: &str, bytes: &[u8]) -> Result<Vec<RawRow>, FetchError> {
    let range: ValueRange = serde_json::from_slice(bytes).map_err(|e| FetchError::Decode {
        sheet: sheet.to_string(),
        reason: e.to_string(),
    })?;

    Ok(range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_range_ragged_rows() {
        let body = br##"{
            "range": "'Student Performance'!A1:K4",
            "majorDimension": "ROWS",
            "values": [
                ["Cohort report"],
                ["ID", "Name"],
                ["S1", "Alice", "", "", "", 85, "90", "#N/A"]
            ]
        }"##;

        let grid = parse_value_range("Student Performance", body).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["Cohort report"]);
        assert_eq!(grid[2][5], "85");
        assert_eq!(grid[2][7], "#N/A");
    }

    #[test]
    fn test_parse_value_range_without_values() {
        let grid = parse_value_range("Empty", br#"{"range":"Empty!A1:Z1000"}"#).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_parse_value_range_invalid_json() {
        let err = parse_value_range("Broken", b"<html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
