use async_trait::async_trait;
use reqwest::{Request, Response};

/// Raw request execution. Implementations add nothing about status codes;
/// outcome classification happens in [`super::HttpTransport`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
