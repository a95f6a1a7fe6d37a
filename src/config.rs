//! Process configuration read from the environment (and `.env`).

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::BasicClient;
use crate::fetch::auth::{ApiKey, UrlParam};
use crate::infra::sheets::{CsvExportSource, ValuesApiSource};
use crate::schema::SheetSchema;
use crate::services::sheet_source::{SheetRef, SheetSource};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spreadsheet_id: String,
    /// Selects the values API when set, the CSV export otherwise.
    pub api_key: Option<String>,
    /// Send the key as `X-goog-api-key` instead of the `key` query parameter.
    pub api_key_in_header: bool,
    pub student_sheet: SheetRef,
    pub task_sheet: SheetRef,
    pub status_placeholder: Option<String>,
    pub http_timeout: Duration,
    pub snapshot_path: Option<PathBuf>,
    pub schema_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let spreadsheet_id = get("SPREADSHEET_ID").context("SPREADSHEET_ID must be set")?;

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: '{raw}'"))?,
            None => 30,
        };

        Ok(Self {
            spreadsheet_id,
            api_key: get("SHEETS_API_KEY"),
            api_key_in_header: get("SHEETS_API_KEY_HEADER")
                .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
                .unwrap_or(false),
            student_sheet: SheetRef::new(
                get("STUDENT_SHEET").unwrap_or_else(|| "Student Performance".to_string()),
                Some(get("STUDENT_SHEET_GID").unwrap_or_else(|| "0".to_string())),
            ),
            task_sheet: SheetRef::new(
                get("TASK_SHEET").unwrap_or_else(|| "Task dump".to_string()),
                get("TASK_SHEET_GID"),
            ),
            status_placeholder: get("STATUS_PLACEHOLDER"),
            http_timeout: Duration::from_secs(http_timeout_secs),
            snapshot_path: get("SNAPSHOT_PATH").map(PathBuf::from),
            schema_path: get("SCHEMA_PATH"),
        })
    }

    /// The schema file if configured, else the built-in layout.
    pub fn schema(&self) -> Result<SheetSchema> {
        let schema = match &self.schema_path {
            Some(path) => SheetSchema::load(path)?,
            None => SheetSchema::default(),
        };

        Ok(match &self.status_placeholder {
            Some(placeholder) => schema.with_status_placeholder(placeholder.clone()),
            None => schema,
        })
    }

    pub fn sheet_source(&self) -> Result<Arc<dyn SheetSource>> {
        let client = BasicClient::with_timeout(self.http_timeout)
            .map_err(|e| anyhow!("failed to build HTTP client: {e}"))?;

        let source: Arc<dyn SheetSource> = match &self.api_key {
            Some(key) if self.api_key_in_header => Arc::new(ValuesApiSource::new(
                Box::new(ApiKey::google(client, key)?),
                &self.spreadsheet_id,
            )),
            Some(key) => Arc::new(ValuesApiSource::new(
                Box::new(UrlParam::google(client, key.clone())),
                &self.spreadsheet_id,
            )),
            None => Arc::new(CsvExportSource::new(client, &self.spreadsheet_id)),
        };

        Ok(source)
    }
}
