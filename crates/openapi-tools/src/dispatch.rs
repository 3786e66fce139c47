//! Call dispatch: one validated invocation -> one HTTP round-trip ->
//! normalized content.

use crate::derive::ToolDescriptor;
use crate::error::{AdapterError, Result};
use crate::schema::validate_arguments;
use reqwest::Method;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Normalized outcome of one dispatched call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallContent {
    /// A single text item.
    Text(String),
    /// Protocol-shaped rich content items passed through verbatim.
    Rich(Vec<Value>),
}

/// Proxies validated invocations as HTTP requests against one base URL.
///
/// One dispatcher serves the whole registry; each call owns its request and
/// response exclusively.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }

    /// Dispatch one invocation.
    ///
    /// Arguments are validated against the descriptor before any HTTP work.
    /// GET with a non-empty argument set carries stringified query
    /// parameters in field order and no body; any other method sends the
    /// argument map as a JSON body. A configured API key is attached as
    /// `x-api-key` on every call.
    ///
    /// # Errors
    ///
    /// Invocation errors: argument validation failures, transport failures,
    /// timeouts, cancellation, and non-2xx responses. Never retried.
    pub async fn call(
        &self,
        tool: &ToolDescriptor,
        arguments: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> Result<CallContent> {
        let accepted = validate_arguments(&tool.fields, arguments)?;
        let url = self.build_url(tool, &accepted)?;

        tracing::debug!("Dispatching {} {}", tool.method, url);

        let mut request = self.client.request(tool.method.clone(), url);
        if tool.method != Method::GET {
            let body: Map<String, Value> = accepted.into_iter().collect();
            request = request.json(&body);
        }
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key.as_str());
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = tokio::select! {
            () = cancel.cancelled() => return Err(AdapterError::Cancelled),
            resp = request.send() => resp.map_err(map_send_error)?,
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body = tokio::select! {
            () = cancel.cancelled() => return Err(AdapterError::Cancelled),
            text = response.text() => text.map_err(map_send_error)?,
        };

        if !status.is_success() {
            return Err(AdapterError::Http(format!(
                "API returned {} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown"),
                body
            )));
        }

        classify_response(&content_type, &body)
    }

    /// Join base URL and path, appending query parameters for GET calls.
    fn build_url(&self, tool: &ToolDescriptor, accepted: &[(String, Value)]) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let path = if tool.path.starts_with('/') {
            tool.path.clone()
        } else {
            format!("/{}", tool.path)
        };
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| AdapterError::Runtime(format!("Invalid request URL: {e}")))?;

        if tool.method == Method::GET && !accepted.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in accepted {
                pairs.append_pair(name, &value_to_string(value));
            }
        }

        Ok(url)
    }
}

/// Render one argument value for a query parameter. Strings stay bare;
/// everything else uses its JSON rendering.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn map_send_error(e: reqwest::Error) -> AdapterError {
    if e.is_timeout() {
        AdapterError::Timeout(e.to_string())
    } else {
        AdapterError::Request(e.to_string())
    }
}

/// Three-way response classification, checked in order: non-JSON content
/// types pass the raw body through as text; JSON image arrays pass through
/// verbatim as rich items; everything else is pretty-printed JSON.
fn classify_response(content_type: &str, body: &str) -> Result<CallContent> {
    if !content_type.contains("application/json") {
        return Ok(CallContent::Text(body.to_string()));
    }

    let parsed: Value = serde_json::from_str(body)?;

    if let Value::Array(items) = &parsed
        && is_image_content(items)
    {
        return Ok(CallContent::Rich(items.clone()));
    }

    Ok(CallContent::Text(serde_json::to_string_pretty(&parsed)?))
}

/// The remote API is trusted to have produced protocol-shaped image items
/// when the first element says so.
fn is_image_content(items: &[Value]) -> bool {
    let Some(first) = items.first().and_then(Value::as_object) else {
        return false;
    };
    first.get("type").and_then(Value::as_str) == Some("image")
        && first.get("data").is_some_and(value_is_truthy)
}

fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
