/*!
 * HTTP/JSON transport for LLM endpoints.
 *
 * One entry point, `LlmClient::call`, posts a JSON payload and returns the
 * response text. Two backend protocols are supported: a buffered single
 * JSON object, and a line-oriented stream in the server-sent-events style
 * (optional `data: ` prefix, `data: [DONE]` sentinel, JSON fragments whose
 * nested content is concatenated in line order).
 */

use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;

/// Shared sink for raw LLM traffic.
///
/// A diagnostic tap: the transport records every raw line received (streaming)
/// or the full raw body (buffered) before any parsing, and callers can later
/// persist the capture to a log file. Recording never alters parsed content.
#[derive(Debug, Clone, Default)]
pub struct RawCapture {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RawCapture {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one raw line or body
    pub fn record(&self, raw: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(raw.to_string());
        }
    }

    /// Snapshot of everything recorded so far, in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Render the capture as one newline-joined document
    pub fn dump(&self) -> String {
        self.lines().join("\n")
    }
}

/// Thin reqwest wrapper implementing the transport call contract
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: Client,
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmClient {
    /// Create a new client; timeouts are supplied per call
    pub fn new() -> Self {
        LlmClient {
            client: Client::builder()
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Post a JSON payload and return the response text.
    ///
    /// Connection failures, timeouts and non-2xx statuses surface as
    /// `ProviderError` and are never retried here; content-level recovery is
    /// the orchestrator's concern.
    pub async fn call(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
        stream: bool,
        raw: Option<&RawCapture>,
    ) -> Result<String, ProviderError> {
        debug!("POST {} (stream={}, timeout={:?})", url, stream, timeout);

        let response = self.client
            .post(url)
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "failed to read error response body".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        if stream {
            decode_sse_stream(response.bytes_stream(), raw).await
        } else {
            let body = response.text().await
                .map_err(|e| ProviderError::ConnectionError(format!("failed to read response body: {}", e)))?;
            if let Some(raw) = raw {
                raw.record(&body);
            }

            let value: Value = serde_json::from_str(&body)
                .map_err(|e| ProviderError::ParseError(format!("invalid JSON response: {}", e)))?;
            extract_content(&value)
                .ok_or_else(|| ProviderError::ParseError("response carries no content field".to_string()))
        }
    }
}

fn classify_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::ConnectionError(e.to_string())
    }
}

/// Extract the generated text from one response object or stream fragment.
///
/// Chat-shaped responses nest it under `message.content`; generate-shaped
/// responses use a top-level `response` field.
fn extract_content(value: &Value) -> Option<String> {
    if let Some(content) = value.get("message").and_then(|m| m.get("content")).and_then(|c| c.as_str()) {
        return Some(content.to_string());
    }
    value.get("response").and_then(|r| r.as_str()).map(|s| s.to_string())
}

/// Reassemble a line-oriented response stream into the full response text.
///
/// Every raw line is recorded into the capture before parsing. Lines may carry
/// a literal `data: ` prefix; `[DONE]` (after prefix stripping) ends the
/// stream without contributing content. Lines that are not JSON or carry no
/// content fragment are skipped rather than failing the call.
async fn decode_sse_stream<S, E>(
    byte_stream: S,
    raw: Option<&RawCapture>,
) -> Result<String, ProviderError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    let mut byte_stream = std::pin::pin!(byte_stream);
    let mut buffer = String::new();
    let mut content = String::new();

    while let Some(chunk) = byte_stream.next().await {
        let chunk = chunk.map_err(|e| ProviderError::ConnectionError(format!("stream error: {}", e)))?;
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(line_end) = buffer.find('\n') {
            let line: String = buffer.drain(..=line_end).collect();
            if consume_stream_line(line.trim_end_matches(['\n', '\r']), &mut content, raw) {
                return Ok(content);
            }
        }
    }

    // Trailing data without a final newline
    if !buffer.is_empty() {
        consume_stream_line(buffer.trim_end_matches('\r'), &mut content, raw);
    }

    Ok(content)
}

/// Process one raw stream line; returns true when the terminal sentinel is seen
fn consume_stream_line(line: &str, content: &mut String, raw: Option<&RawCapture>) -> bool {
    if line.is_empty() {
        return false;
    }

    if let Some(raw) = raw {
        raw.record(line);
    }

    let data = line.strip_prefix("data: ").unwrap_or(line);
    if data == "[DONE]" {
        return true;
    }

    match serde_json::from_str::<Value>(data) {
        Ok(value) => {
            if let Some(fragment) = extract_content(&value) {
                content.push_str(&fragment);
            }
        }
        Err(_) => {
            warn!("Skipping malformed stream line: {}", data);
        }
    }

    false
}
