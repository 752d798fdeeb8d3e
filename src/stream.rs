//! Push-based status updates over server-sent events.
//!
//! The server writes one record per line. Blank lines and `:` comments are
//! keepalives and produce nothing; `data:` lines carry JSON status payloads;
//! any other field line (`event:`, `id:`, `retry:`) is handed to the caller
//! as-is.

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio_util::sync::CancellationToken;

use crate::client::{error_from_response, Client};
use crate::errors::Result;

/// One record received from a status stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// A `data:` line whose payload decoded as JSON.
    Data(serde_json::Value),
    /// A `data:` line whose payload is not JSON, verbatim after the prefix.
    RawData(String),
    /// Any other non-comment line, e.g. `event: status`.
    Field(String),
}

/// Interpret a single line of an event stream.
///
/// Returns `None` for blank lines and comments.
pub fn parse_event_line(line: &str) -> Option<StatusEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    if let Some(data) = line.strip_prefix("data:") {
        let data = data.trim();
        return Some(match serde_json::from_str(data) {
            Ok(value) => StatusEvent::Data(value),
            Err(_) => StatusEvent::RawData(data.to_string()),
        });
    }

    Some(StatusEvent::Field(line.to_string()))
}

/// Accumulates raw bytes and yields complete `\n`-terminated lines.
///
/// Bytes are only decoded once a full line is present, so a UTF-8 sequence
/// split across network chunks is never mangled.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Drain whatever is left after the last newline.
    pub fn take_rest(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let mut rest = std::mem::take(&mut self.buf);
        if rest.last() == Some(&b'\r') {
            rest.pop();
        }
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// An open status subscription.
///
/// Read it with [`next_event`](Self::next_event) until it returns `None`,
/// which happens when the server closes the stream or the cancellation token
/// fires. Either way the HTTP connection is released. A last line the server
/// sends without a trailing newline is still delivered; a partially received
/// line at cancellation is dropped.
pub struct StatusStream {
    response: Option<reqwest::Response>,
    buffer: LineBuffer,
    cancel: CancellationToken,
    resource_id: String,
}

impl StatusStream {
    /// Wait for the next record.
    pub async fn next_event(&mut self) -> Option<Result<StatusEvent>> {
        loop {
            if self.cancel.is_cancelled() {
                self.close("cancelled");
                return None;
            }

            while let Some(line) = self.buffer.next_line() {
                if let Some(event) = parse_event_line(&line) {
                    return Some(Ok(event));
                }
            }

            let response = self.response.as_mut()?;
            let cancel = self.cancel.clone();
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                chunk = response.chunk() => Some(chunk),
            };

            match chunk {
                None => {
                    self.close("cancelled");
                    return None;
                }
                Some(Ok(Some(bytes))) => self.buffer.extend(&bytes),
                Some(Ok(None)) => {
                    let tail = self.buffer.take_rest();
                    self.close("closed by server");
                    return tail.as_deref().and_then(parse_event_line).map(Ok);
                }
                Some(Err(e)) => {
                    self.close("transport error");
                    return Some(Err(e.into()));
                }
            }
        }
    }

    /// `true` once the connection has been released.
    pub fn is_closed(&self) -> bool {
        self.response.is_none()
    }

    fn close(&mut self, reason: &str) {
        if self.response.take().is_some() {
            tracing::debug!(id = %self.resource_id, reason, "status stream closed");
        }
        self.buffer.clear();
    }
}

impl Client {
    /// Subscribe to status updates for a video file.
    ///
    /// The stream stays open until the server ends it or `cancel` is
    /// triggered. A non-success response when opening is returned as an error
    /// straight away.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example(client: videojungle::Client) -> videojungle::Result<()> {
    /// let cancel = CancellationToken::new();
    /// let mut stream = client.subscribe_video_status("video-id", cancel.clone()).await?;
    /// while let Some(event) = stream.next_event().await {
    ///     println!("{:?}", event?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn subscribe_video_status(
        &self,
        video_id: &str,
        cancel: CancellationToken,
    ) -> Result<StatusStream> {
        let url = self.url(&format!("/videos/{video_id}/subscribe"));

        let response = self
            .stream_http()
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .header("X-API-Key", self.api_key())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        tracing::info!(id = video_id, "subscribed to status stream");

        Ok(StatusStream {
            response: Some(response),
            buffer: LineBuffer::default(),
            cancel,
            resource_id: video_id.to_string(),
        })
    }
}
