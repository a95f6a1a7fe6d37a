mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use tracing::debug;

use crate::error::FetchError;

/// Upstream error bodies are cut to this many bytes before they are kept.
const MAX_ERROR_BODY: usize = 256;

/// Issues a GET for `url` through `client` and returns the body bytes.
///
/// Non-success statuses are reported with the start of the response body
/// attached.
/// Transport errors have their URL stripped since it may carry an API key.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: redact(url),
        reason: e.to_string(),
    })?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await.map_err(|e| e.without_url())?;
    let status = resp.status();
    debug!(status = status.as_u16(), "Sheet response received");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        });
    }

    let bytes = resp.bytes().await.map_err(|e| e.without_url())?;
    Ok(bytes.to_vec())
}

/// Keeps at most [`MAX_ERROR_BODY`] bytes, cut on a char boundary.
fn truncate_body(mut body: String) -> String {
    let body_len = body.trim_end().len();
    body.truncate(body_len);
    if body.len() <= MAX_ERROR_BODY {
        return body;
    }

    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push('…');
    body
}

/// Drops the query string so API keys never reach the logs.
pub fn redact(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?…"),
        None => url.to_string(),
    }
}
