//! Google Sheets adapters for [`SheetSource`](crate::services::sheet_source::SheetSource).
//!
//! [`ValuesApiSource`] reads through the v4 values endpoint with an API key.
//! [`CsvExportSource`] reads the public CSV export and needs no key.

mod csv_export;
mod values_api;

pub use csv_export::{CsvExportSource, parse_csv};
pub use values_api::{ValuesApiSource, parse_value_range};

use crate::error::FetchError;

/// Appends `segments` to the path of `base`, percent-encoding each one.
fn build_url(base: &str, segments: &[&str]) -> Result<reqwest::Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidUrl {
        url: base.to_string(),
        reason,
    };

    let mut url = reqwest::Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
