//! Client for an OpenAI-compatible completion endpoint.
//!
//! [`CompletionClient::open`] performs the streaming request and returns a
//! lazy, cancellable stream of [`Delta`]s. The response body is owned by that
//! stream, so dropping it (after the end, an error, or cancellation) releases
//! the connection.

use std::pin::Pin;

use futures::Stream;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::config::{join_url, ApiConfigState, ClientSettings, Endpoint};
use crate::error::{ChatError, ChatResult, ConfigError, TransportError};
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelList};
use crate::sse::{interpret, Delta, FrameDecoder};
use crate::traits::{ByteStream, Headers, HttpClient, Response};

/// Deltas of one streamed reply.
///
/// Ends after [`Delta::StreamEnd`], when the body closes, or on cancellation.
/// A transport failure mid-body is yielded as one final `Err` item.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<Delta, ChatError>> + Send>>;

/// Completion client bound to one resolved endpoint.
///
/// # Example
///
/// ```ignore
/// use chatline::adapters::ReqwestHttpClient;
/// use chatline::client::CompletionClient;
///
/// let client = CompletionClient::from_config(ReqwestHttpClient::new(), &state, &settings)?;
/// let mut deltas = client.open(&history, CancellationToken::new()).await?;
/// while let Some(delta) = deltas.next().await { /* ... */ }
/// ```
#[derive(Debug, Clone)]
pub struct CompletionClient<H: HttpClient> {
    http: H,
    endpoint: Endpoint,
}

impl<H: HttpClient> CompletionClient<H> {
    pub fn new(http: H, endpoint: Endpoint) -> Self {
        Self { http, endpoint }
    }

    /// Resolve the selected endpoint and model and build a client for them.
    pub fn from_config(
        http: H,
        state: &ApiConfigState,
        settings: &ClientSettings,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(http, Endpoint::resolve(state, settings)?))
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn headers(&self, accept: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), accept.to_string());
        if let Some(key) = &self.endpoint.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }

    fn request(&self, messages: Vec<ChatMessage>) -> ChatCompletionRequest {
        let settings = &self.endpoint.settings;
        ChatCompletionRequest::new(self.endpoint.model.clone(), messages)
            .with_max_tokens(settings.max_tokens)
            .with_temperature(settings.temperature)
    }

    /// Start a streamed completion for `history`.
    ///
    /// Resolves once the response headers arrived. A non-2xx status fails
    /// here, before any delta. Firing `cancel` while waiting for headers
    /// abandons the request and yields an already finished stream.
    pub async fn open(
        &self,
        history: &[ChatMessage],
        cancel: CancellationToken,
    ) -> ChatResult<DeltaStream> {
        if history.is_empty() {
            return Err(ChatError::InvalidRequest(
                "conversation history is empty".to_string(),
            ));
        }

        let request = self.request(history.to_vec()).streaming();
        let body = serde_json::to_string(&request)
            .map_err(|e| ChatError::InvalidRequest(e.to_string()))?;
        let url = self.endpoint.completions_url();
        let headers = self.headers("text/event-stream");

        tracing::debug!(
            "Opening completion stream: url={} model={} messages={}",
            url,
            self.endpoint.model,
            history.len()
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Completion stream cancelled before response headers");
                return Ok(Box::pin(futures::stream::empty()));
            }
            response = self.http.post_stream(&url, &body, &headers) => response,
        };

        match response {
            Ok(body) => Ok(delta_stream(body, cancel)),
            Err(err) => {
                tracing::debug!("Completion request failed: {} ({})", err, err.error_code());
                Err(err.into())
            }
        }
    }

    /// Perform a non-streaming completion and return the reply text.
    pub async fn complete(&self, messages: Vec<ChatMessage>, max_tokens: u32) -> ChatResult<String> {
        let request = self.request(messages).with_max_tokens(max_tokens);
        let body = serde_json::to_string(&request)
            .map_err(|e| ChatError::InvalidRequest(e.to_string()))?;

        let response = self
            .http
            .post(
                &self.endpoint.completions_url(),
                &body,
                &self.headers("application/json"),
            )
            .await?
            .error_for_status()?;

        let parsed: ChatCompletionResponse = parse_json(&response)?;
        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| {
                TransportError::InvalidResponse("response has no message content".to_string())
                    .into()
            })
    }

    /// List the model ids offered by the endpoint.
    pub async fn list_models(&self) -> ChatResult<Vec<String>> {
        fetch_models(
            &self.http,
            &self.endpoint.base_url,
            self.endpoint.api_key.as_deref(),
        )
        .await
    }
}

/// List the model ids offered at `base_url`.
///
/// Needs no selected model, so it can be used to populate a config.
pub async fn fetch_models<H: HttpClient + ?Sized>(
    http: &H,
    base_url: &str,
    api_key: Option<&str>,
) -> ChatResult<Vec<String>> {
    let url = join_url(base_url, "/models");
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    if let Some(key) = api_key {
        headers.insert("Authorization".to_string(), format!("Bearer {}", key));
    }

    tracing::debug!("Fetching models: url={}", url);
    let response = http.get(&url, &headers).await?.error_for_status()?;
    let models: ModelList = parse_json(&response)?;
    Ok(models.ids())
}

fn parse_json<T: serde::de::DeserializeOwned>(response: &Response) -> Result<T, TransportError> {
    response
        .json()
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))
}

/// Wire a response body through the frame decoder and interpreter.
fn delta_stream(body: ByteStream, cancel: CancellationToken) -> DeltaStream {
    Box::pin(async_stream::stream! {
        let mut body = body;
        let mut decoder = FrameDecoder::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!("Completion stream cancelled");
                    break;
                }
                next = body.next() => next,
            };

            let payloads = match next {
                Some(Ok(chunk)) => decoder.push(&chunk),
                Some(Err(err)) => {
                    tracing::debug!("Completion stream failed mid-body: {}", err);
                    yield Err(ChatError::Transport(err));
                    break;
                }
                None => {
                    tracing::debug!("Completion stream closed by server");
                    decoder.finish()
                }
            };

            for payload in &payloads {
                for delta in interpret(payload) {
                    yield Ok(delta);
                }
            }

            // Set by the sentinel or by `finish` after the body closed
            if decoder.is_finished() {
                break;
            }
        }
    })
}
