use std::{fmt, sync::Arc};

use config::ClientConfig;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use crate::{
    args::ToolArgs,
    error::ToolError,
    transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport},
};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Request plumbing shared by every client: base URL resolution, path
/// joining, status handling and JSON decoding.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    default_base_url: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("default_base_url", &self.default_base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, default_base_url: impl Into<String>) -> Self {
        Self {
            transport,
            default_base_url: default_base_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            Arc::new(ReqwestTransport::new(config.request_timeout())),
            config.api_url.clone(),
        )
    }

    /// Base address for one call: the `api_url` argument, else the configured default.
    pub fn base_url(&self, args: &ToolArgs) -> String {
        args.api_url()
            .unwrap_or_else(|| self.default_base_url.clone())
    }

    pub fn url(base_url: &str, path: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn request(base_url: &str, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, Self::url(base_url, path))
    }

    /// Sends `request` and returns the raw body of a 200 response.
    pub async fn call(
        &self,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<String, ToolError> {
        tracing::debug!(method = %request.method, url = %request.url, operation, "Sending backend request");

        let response = self.transport.send(request).await.map_err(|source| {
            tracing::warn!(operation, error = %source, "Backend request failed");
            ToolError::Transport { operation, source }
        })?;

        if response.status != 200 {
            tracing::warn!(
                operation,
                status = response.status,
                body = %truncate_body(&response.body, 200),
                "Backend returned error status"
            );
            return Err(ToolError::Remote {
                operation,
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.body)
    }

    pub async fn call_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<T, ToolError> {
        let body = self.call(operation, request).await?;
        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(operation, error = %source, "Backend response did not decode");
            ToolError::Decode { resource, source }
        })
    }

    /// Untyped variant for payloads whose shape is resolved after decoding.
    pub async fn call_value(
        &self,
        resource: &'static str,
        operation: &'static str,
        request: HttpRequest,
    ) -> Result<Value, ToolError> {
        self.call_json::<Value>(resource, operation, request).await
    }
}

/// One path segment, percent-encoded so it cannot split or end the path.
pub fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// `path?key=value` with the value form-urlencoded.
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    format!("{path}?{query}")
}

fn truncate_body(body: &str, limit: usize) -> String {
    let mut chars = body.chars();
    let snippet: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{snippet}... [truncated]")
    } else {
        snippet
    }
}
