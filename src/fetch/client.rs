use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request.
///
/// Sheet sources hold a `Box<dyn HttpClient>` so credentials can be layered
/// on with the wrappers in [`auth`](super::auth) without the source knowing
/// how the key travels.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
