/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for task API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
[UPDATE]: 2026-10-12 Percent-encode task ids as path segments
*/

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Base URL of the drawing-test service
pub const DEFAULT_BASE_URL: &str = "https://sirius-draw-test-94500a1b4a2f.herokuapp.com";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the drawing-test task API
#[derive(Debug, Clone)]
pub struct DrawTestClient {
    http_client: Client,
    base_url: Url,
}

impl DrawTestClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client pointed at another deployment (or a mock server)
    pub fn with_config_and_base_url(
        config: ClientConfig,
        base_url: &str,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(format!("base url cannot carry paths: {base_url}").into());
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL from path segments below the base URL.
    ///
    /// Segments are percent-encoded, so task ids can never escape their path position.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Build request builder for an endpoint
    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http_client.request(method, self.endpoint(segments))
    }

    /// Plain GET against an absolute URL (report downloads live on other hosts)
    pub(crate) fn get_absolute(&self, url: Url) -> RequestBuilder {
        self.http_client.get(url)
    }
}

/// Reason phrase for a status code, empty when the code has none.
pub(crate) fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

/// Consume an error response and render its `detail` field as a message suffix.
///
/// Unreadable or non-JSON bodies yield an empty suffix.
pub(crate) async fn error_detail(response: Response) -> String {
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            tracing::debug!(error = %err, "error body unreadable");
            return String::new();
        }
    };

    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(fields)) => match fields.get("detail") {
            Some(detail) if is_present(detail) => format!(" - {detail}"),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
