//! Chat-completion client for the OpenRouter endpoint.
//!
//! One call issues exactly one POST; there are no retries. Failures are
//! folded into [`CompletionError`] so the session can show them as a notice.

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ChatMessage, ChatRequest, ChatResponse, MAX_TOKENS};
use crate::core::message::Turn;
use crate::core::sanitize::clean_response;
use crate::core::session::Temperature;
use crate::utils::url::construct_api_url;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Connection, timeout, or body read failure.
    Transport(String),
    /// The endpoint answered with something other than 200.
    Http { status: u16, body: String },
    /// A 200 whose body was not a usable completion.
    Parse(String),
    /// A well-formed reply whose content was empty after cleaning.
    EmptyResponse,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Transport(message) => write!(f, "Request failed: {message}"),
            CompletionError::Http { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "API request failed with status {status}")
                } else {
                    write!(f, "API request failed with status {status}: {body}")
                }
            }
            CompletionError::Parse(message) => {
                write!(f, "Could not read API response: {message}")
            }
            CompletionError::EmptyResponse => write!(f, "The model returned an empty response"),
        }
    }
}

impl Error for CompletionError {}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Transport(describe_transport_error(&err))
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        return "the request timed out".to_string();
    }
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Anything that can turn a transcript into a cleaned assistant reply.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(
        &self,
        turns: &[Turn],
        model_id: &str,
        temperature: Temperature,
    ) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl CompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(client, base_url, api_key))
    }

    pub fn with_http_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn build_request(turns: &[Turn], model_id: &str, temperature: Temperature) -> ChatRequest {
        ChatRequest {
            model: model_id.to_string(),
            messages: turns.iter().map(ChatMessage::from).collect(),
            max_tokens: MAX_TOKENS,
            temperature: temperature.as_f64(),
        }
    }
}

#[async_trait]
impl Completer for CompletionClient {
    async fn complete(
        &self,
        turns: &[Turn],
        model_id: &str,
        temperature: Temperature,
    ) -> Result<String, CompletionError> {
        let request = Self::build_request(turns, model_id, temperature);
        let chat_url = construct_api_url(&self.base_url, "chat/completions");

        info!(
            model = model_id,
            turns = turns.len(),
            temperature = temperature.as_f64(),
            "sending completion request"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(chat_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .inspect_err(|err| warn!(error = %err, "completion request failed"))?;

        let status = response.status();
        let body = response.text().await?;
        debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "completion response received"
        );

        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "completion endpoint returned an error");
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion_body(&body)
    }
}

/// Extract and sanitize `choices[0].message.content` from a success body.
pub fn parse_completion_body(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|err| CompletionError::Parse(err.to_string()))?;
    if response.choices.is_empty() {
        return Err(CompletionError::Parse(
            "response contained no choices".to_string(),
        ));
    }
    Ok(clean_response(response.first_content()))
}

#[derive(Clone, Debug)]
pub enum CompletionMessage {
    Completed(String),
    Failed(CompletionError),
}

#[derive(Debug, Clone)]
pub struct CompletionParams {
    pub turns: Vec<Turn>,
    pub model_id: String,
    pub temperature: Temperature,
    pub request_id: u64,
}

/// Runs completions on background tasks and reports results over a channel
/// tagged with the request id that started them.
#[derive(Clone)]
pub struct CompletionService {
    tx: mpsc::UnboundedSender<(CompletionMessage, u64)>,
}

impl CompletionService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(CompletionMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_completion<C>(&self, completer: std::sync::Arc<C>, params: CompletionParams)
    where
        C: Completer + ?Sized + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let CompletionParams {
                turns,
                model_id,
                temperature,
                request_id,
            } = params;

            let message = match completer.complete(&turns, &model_id, temperature).await {
                Ok(text) => CompletionMessage::Completed(text),
                Err(err) => CompletionMessage::Failed(err),
            };
            let _ = tx.send((message, request_id));
        });
    }
}
