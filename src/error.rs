//! Error types shared across the ingest pipeline.

use thiserror::Error;

/// Failure talking to the spreadsheet source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to spreadsheet source failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid spreadsheet URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("spreadsheet source returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no gid configured for sheet '{0}'")]
    MissingGid(String),

    #[error("could not decode sheet '{sheet}': {reason}")]
    Decode { sheet: String, reason: String },
}

/// The fixed sheet layout does not fit the sheet that was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("sheet has {found} header rows, expected at least {expected}")]
    MissingHeaderRows { found: usize, expected: usize },

    #[error("{field} column {position} is outside the header row ({width} columns)")]
    ColumnOutOfBounds {
        field: &'static str,
        position: usize,
        width: usize,
    },

    #[error("task set is empty")]
    EmptyTaskSet,

    #[error("task '{0}' is listed more than once")]
    DuplicateTask(String),
}

/// Why a refresh produced no new snapshot.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("no student records found in sheet '{0}'")]
    Empty(String),
}
