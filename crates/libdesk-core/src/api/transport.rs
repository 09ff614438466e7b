//! The transport seam and its HTTP implementation.

use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::{header, Client};
use tracing::debug;

use super::{Request, Response, TransportError};

/// Added to the command timeout to get the HTTP client's own timeout.
const HTTP_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Strictly longer than the command timeout; a slow server is a `TimedOut`.
fn http_timeout(command_timeout: Duration) -> Duration {
    command_timeout.saturating_add(HTTP_TIMEOUT_MARGIN)
}

/// Delivers one request envelope and yields one response envelope.
///
/// The returned future must be `'static` so it can run on a worker task
/// independent of the caller.
pub trait Transport: Send + Sync {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>>;
}

/// Posts each envelope as JSON to a single dispatch endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        command_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(http_timeout(command_timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(
        client: Client,
        endpoint: String,
        request: Request,
    ) -> Result<Response, TransportError> {
        debug!(uri = %request.uri, %endpoint, "Sending request");

        let response = client
            .post(&endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> BoxFuture<'static, Result<Response, TransportError>> {
        Self::post(self.client.clone(), self.endpoint.clone(), request).boxed()
    }
}
