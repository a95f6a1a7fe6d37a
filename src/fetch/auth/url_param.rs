use crate::fetch::client::HttpClient;
use async_trait::async_trait;
use reqwest::Request;

/// An [`HttpClient`] wrapper that appends an API key as a URL query parameter.
///
/// The Sheets values API expects the key as `key=<value>`.
pub struct UrlParam<C> {
    inner: C,
    param_name: String,
    key: String,
}

impl<C> UrlParam<C> {
    pub fn new(inner: C, param_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            inner,
            param_name: param_name.into(),
            key: key.into(),
        }
    }

    pub fn google(inner: C, key: String) -> Self {
        Self::new(inner, "key", key)
    }

    fn sign(&self, req: &mut Request) {
        req.url_mut()
            .query_pairs_mut()
            .append_pair(&self.param_name, &self.key);
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for UrlParam<C> {
    async fn execute(&self, mut req: Request) -> reqwest::Result<reqwest::Response> {
        self.sign(&mut req);
        self.inner.execute(req).await
    }
}
