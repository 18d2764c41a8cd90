//! HTTP utilities for REST API calls

use crate::error::ApiError;
use anyhow::{Context, Result};
use reqwest::{Client, Method};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// A fully built request, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Set a query parameter, replacing any existing value for `key`
    pub fn set_query(&mut self, key: &str, value: impl Into<String>) {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.into()));
    }
}

/// HTTP client wrapper for API calls
#[derive(Clone, Debug)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gapi/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Send a request, optionally signed with a bearer token.
    ///
    /// Resolves with the parsed JSON body, or `Value::Null` when the body is
    /// empty. Non-success statuses fail with [`ApiError::Status`].
    pub async fn execute(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<Value> {
        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = self.client.request(request.method.clone(), &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            let body = serde_json::from_str(&response_body)
                .unwrap_or_else(|_| Value::String(response_body));
            return Err(ApiError::Status { status, body }.into());
        }

        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }
}
