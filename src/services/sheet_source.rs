//! Trait and types for reading raw grids from a spreadsheet provider.

use async_trait::async_trait;

use crate::error::FetchError;

/// One sheet row as text cells. Cells past the end of the row are absent.
pub type RawRow = Vec<String>;

/// Describes how a sheet is located within the provider.
///
/// The values API addresses sheets by title, the CSV export by `gid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub title: String,
    pub gid: Option<String>,
}

impl SheetRef {
    pub fn new(title: impl Into<String>, gid: Option<String>) -> Self {
        Self {
            title: title.into(),
            gid,
        }
    }
}

/// Abstraction over a tabular data provider (e.g., Google Sheets).
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Returns every row of `sheet`, header rows included.
    async fn fetch_grid(&self, sheet: &SheetRef) -> Result<Vec<RawRow>, FetchError>;

    /// Short label reported by the health endpoint.
    fn describe(&self) -> &'static str;
}
