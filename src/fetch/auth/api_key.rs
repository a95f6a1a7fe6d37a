use crate::fetch::client::HttpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};

/// An [`HttpClient`] wrapper that injects an API key as an HTTP header.
///
/// Google APIs accept the key in `X-goog-api-key`, which keeps it out of
/// request URLs and proxy logs.
pub struct ApiKey<C> {
    inner: C,
    header_name: HeaderName,
    value: HeaderValue,
}

impl<C> ApiKey<C> {
    /// Validates `header_name` and `key` once so requests never fail on them.
    pub fn new(inner: C, header_name: &str, key: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(header_name.as_bytes())
            .with_context(|| format!("invalid API key header name '{header_name}'"))?;
        let mut value = HeaderValue::from_str(key).context("API key is not a valid header value")?;
        value.set_sensitive(true);

        Ok(Self {
            inner,
            header_name,
            value,
        })
    }

    pub fn google(inner: C, key: &str) -> Result<Self> {
        Self::new(inner, "X-goog-api-key", key)
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for ApiKey<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(self.header_name.clone(), self.value.clone());
        self.inner.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;

    #[test]
    fn test_rejects_bad_header_name() {
        assert!(ApiKey::new(BasicClient::new(), "bad header", "k").is_err());
    }

    #[test]
    fn test_google_header() {
        let client = ApiKey::google(BasicClient::new(), "abc").unwrap();
        assert_eq!(client.header_name.as_str(), "x-goog-api-key");
        assert!(client.value.is_sensitive());
    }
}
