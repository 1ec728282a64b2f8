//! Mock HTTP client for testing.
//!
//! Returns scripted responses and streamed bodies, records every request,
//! and counts how many streamed bodies were opened and released.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use crate::error::TransportError;
use crate::traits::{ByteStream, Headers, HttpClient, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail before any response arrives
    Error(TransportError),
    /// Stream the chunks, then end
    Stream(Vec<Bytes>),
    /// Fail a streaming request before the body starts
    StreamError(TransportError),
    /// Stream the chunks, then fail mid-body
    StreamThenError(Vec<Bytes>, TransportError),
    /// Stream the chunks, then stall forever
    StreamThenPending(Vec<Bytes>),
    /// Never deliver response headers
    Hang,
}

/// Mock HTTP client for testing.
///
/// Responses are looked up first in a per-URL FIFO queue, then in the
/// fixed per-URL table (exact, then prefix match), then the default.
///
/// # Example
///
/// ```ignore
/// use chatline::adapters::mock::{MockHttpClient, MockResponse};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://mock/v1/chat/completions",
///     MockResponse::Stream(vec![Bytes::from("data: [DONE]\n\n")]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    streams_opened: Arc<AtomicUsize>,
    streams_released: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Matched exactly, then as a prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Queue a one-shot response for a URL, served before `set_response` ones.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        let mut queued = self.queued.lock().unwrap();
        queued
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
        self.queued.lock().unwrap().clear();
    }

    /// Number of streamed bodies handed out.
    pub fn streams_opened(&self) -> usize {
        self.streams_opened.load(Ordering::SeqCst)
    }

    /// Number of streamed bodies that have been dropped.
    pub fn streams_released(&self) -> usize {
        self.streams_released.load(Ordering::SeqCst)
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }
        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        self.default_response.lock().unwrap().clone()
    }

    fn track(&self, inner: ByteStream) -> ByteStream {
        self.streams_opened.fetch_add(1, Ordering::SeqCst);
        Box::pin(TrackedStream {
            inner,
            released: Arc::clone(&self.streams_released),
        })
    }

    fn buffered(&self, url: &str) -> Result<Response, TransportError> {
        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) | Some(MockResponse::StreamError(err)) => Err(err),
            Some(MockResponse::Hang) => Err(TransportError::Timeout(
                "Hang response on non-stream request".to_string(),
            )),
            Some(_) => Err(TransportError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(TransportError::Other(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}

/// Stream wrapper that counts when the body is dropped.
struct TrackedStream {
    inner: ByteStream,
    released: Arc<AtomicUsize>,
}

impl Stream for TrackedStream {
    type Item = Result<Bytes, TransportError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, TransportError> {
        self.record_request("GET", url, headers, None);
        self.buffered(url)
    }

    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, TransportError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.buffered(url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, TransportError> {
        use futures::StreamExt;

        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(self.track(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok)))))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let stream = futures::stream::iter(chunks.into_iter().map(Ok))
                    .chain(futures::stream::once(async move { Err(err) }));
                Ok(self.track(Box::pin(stream)))
            }
            Some(MockResponse::StreamThenPending(chunks)) => {
                let stream = futures::stream::iter(chunks.into_iter().map(Ok))
                    .chain(futures::stream::pending());
                Ok(self.track(Box::pin(stream)))
            }
            Some(MockResponse::Hang) => futures::future::pending().await,
            Some(MockResponse::Success(response)) => {
                if response.is_success() {
                    Ok(self.track(Box::pin(futures::stream::iter(vec![Ok(response.body)]))))
                } else {
                    Err(TransportError::Status {
                        status: response.status,
                        message: String::from_utf8_lossy(&response.body).into_owned(),
                    })
                }
            }
            Some(MockResponse::Error(err)) | Some(MockResponse::StreamError(err)) => Err(err),
            None => Err(TransportError::Other(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}
