//! Four-way outcome classification at the HTTP boundary.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::client::HttpClient;

/// Outcome of a single `GET` against the data source.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// 2xx with a JSON payload.
    Success(Value),
    /// The source has no data for this path (404, or a `{"status":"not_found"}` body).
    NotFound,
    /// 403 / 429. Further calls are expected to fail the same way.
    QuotaExceeded,
    /// Timeout, network error, unexpected status, or an unreadable body.
    Failure(String),
}

/// Request/response boundary used by the fetcher, cache, and services.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Response;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, path: &str) -> Response {
        (**self).get(path).await
    }
}

/// [`Transport`] over an [`HttpClient`], rooted at `base_url`.
///
/// `timeout` bounds the whole exchange (send plus body read); hitting it
/// yields [`Response::Failure`].
pub struct HttpTransport<C> {
    client: C,
    base_url: String,
    timeout: Duration,
}

impl<C: HttpClient> HttpTransport<C> {
    pub fn new(client: C, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn exchange(&self, url: reqwest::Url) -> Response {
        let req = reqwest::Request::new(reqwest::Method::GET, url);
        let resp = match self.client.execute(req).await {
            Ok(resp) => resp,
            Err(e) => return Response::Failure(e.to_string()),
        };

        let status = resp.status();
        match resp.bytes().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => Response::Failure(format!("failed to read body: {e}")),
        }
    }
}

#[async_trait]
impl<C: HttpClient> Transport for HttpTransport<C> {
    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get(&self, path: &str) -> Response {
        let url = match self.url_for(path).parse::<reqwest::Url>() {
            Ok(url) => url,
            Err(e) => return Response::Failure(format!("invalid url: {e}")),
        };

        let outcome = match tokio::time::timeout(self.timeout, self.exchange(url)).await {
            Ok(outcome) => outcome,
            Err(_) => Response::Failure(format!("timed out after {:?}", self.timeout)),
        };
        debug!(outcome = outcome_name(&outcome), "Request finished");
        outcome
    }
}

/// Maps an HTTP status and body onto a [`Response`].
pub fn classify_response(status: StatusCode, body: &[u8]) -> Response {
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Response::QuotaExceeded;
    }
    if status == StatusCode::NOT_FOUND {
        return Response::NotFound;
    }
    if !status.is_success() {
        return Response::Failure(format!("unexpected status {status}"));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) if is_not_found_marker(&value) => Response::NotFound,
        Ok(value) => Response::Success(value),
        Err(e) => Response::Failure(format!("invalid json body: {e}")),
    }
}

fn is_not_found_marker(value: &Value) -> bool {
    value.get("status").and_then(Value::as_str) == Some("not_found")
}

fn outcome_name(response: &Response) -> &'static str {
    match response {
        Response::Success(_) => "success",
        Response::NotFound => "not_found",
        Response::QuotaExceeded => "quota_exceeded",
        Response::Failure(_) => "failure",
    }
}
