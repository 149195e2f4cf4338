//! Streaming LLM API client for OpenAI-compatible endpoints and Anthropic.

use async_openai::{
    config::OPENAI_API_BASE,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use derive_more::{Display, Error};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::{debug, error, info, instrument};

/// Default Anthropic API base.
pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

/// Ordered text fragments of one response.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// LLM provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI chat completions, or any endpoint speaking the same protocol
    /// (Gemini's OpenAI endpoint, ModelScope, local servers).
    OpenAI,
    /// Anthropic messages API.
    Anthropic,
}

/// Configuration for LLM client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: Option<String>,
    final_answer_marker: Option<String>,
}

impl LlmConfig {
    /// Creates a new LLM configuration.
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            base_url: None,
            final_answer_marker: None,
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Inserts `marker` once between a reasoning model's thinking and its
    /// answer, so the answer can be told apart in the concatenated text.
    pub fn with_final_answer_marker(mut self, marker: impl Into<String>) -> Self {
        self.final_answer_marker = Some(marker.into());
        self
    }

    /// Gets the provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Gets the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Gets the max tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Gets the API base override, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Gets the final-answer marker, if any.
    pub fn final_answer_marker(&self) -> Option<&str> {
        self.final_answer_marker.as_deref()
    }
}

/// LLM client that abstracts over multiple providers.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
}

impl LlmClient {
    /// Creates a new LLM client.
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self { config }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Starts a streamed completion.
    ///
    /// Resolves once the request is accepted; the returned stream yields
    /// text fragments in the order the provider sends them.
    #[instrument(skip(self, system_prompt, user_message), fields(provider = ?self.config.provider, model = %self.config.model))]
    pub async fn stream(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<FragmentStream, LlmError> {
        debug!("Starting streamed completion");
        match self.config.provider {
            LlmProvider::OpenAI => self.stream_openai(system_prompt, user_message).await,
            LlmProvider::Anthropic => self.stream_anthropic(system_prompt, user_message).await,
        }
    }

    /// Streams a completion from Anthropic using server-sent events.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn stream_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<FragmentStream, LlmError> {
        let client = reqwest::Client::new();
        let base = self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_BASE);

        debug!("Building Anthropic API request");
        let request_body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system_prompt,
            "stream": true,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        debug!("Sending request to Anthropic");
        let response = client
            .post(format!("{}/messages", base))
            .header("x-api-key", self.config.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                LlmError::new(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(LlmError::new(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        let mut decoder = SseDecoder::default();
        let fragments = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => decoder
                    .push(&bytes)
                    .into_iter()
                    .filter_map(|payload| anthropic_text(&payload).transpose())
                    .collect::<Vec<_>>(),
                Err(e) => {
                    error!(error = ?e, "Anthropic stream interrupted");
                    vec![Err(LlmError::new(format!("Anthropic stream interrupted: {}", e)))]
                }
            })
            .flat_map(futures::stream::iter);

        info!("Anthropic stream opened");
        Ok(Box::pin(fragments))
    }

    /// Streams a completion from an OpenAI-compatible endpoint.
    ///
    /// Chunks are decoded by hand rather than through typed responses so
    /// that `reasoning_content` deltas (DeepSeek-R1, QwQ) come through too.
    #[instrument(skip(self, system_prompt, user_message))]
    async fn stream_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<FragmentStream, LlmError> {
        let client = reqwest::Client::new();
        let base = self.config.base_url.as_deref().unwrap_or(OPENAI_API_BASE);

        debug!("Building chat completion request");
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build system message");
                        LlmError::new(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        error!(error = ?e, "Failed to build user message");
                        LlmError::new(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        // Compatible endpoints (ModelScope, DashScope, Gemini) still expect `max_tokens`.
        #[allow(deprecated)]
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .max_tokens(self.config.max_tokens)
            .stream(true)
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build request");
                LlmError::new(format!("Failed to build request: {}", e))
            })?;

        debug!(base_url = %base, "Sending streamed request");
        let response = client
            .post(format!("{}/chat/completions", base))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "OpenAI API request failed");
                LlmError::new(format!("OpenAI API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let response_text = response.text().await.unwrap_or_default();
            error!(status = %status, response = %response_text, "OpenAI API error");
            return Err(LlmError::new(format!(
                "OpenAI API error {}: {}",
                status, response_text
            )));
        }

        let mut decoder = SseDecoder::default();
        let mut deltas = ChatDeltas::new(self.config.final_answer_marker.clone());
        let fragments = response
            .bytes_stream()
            .map(move |chunk| match chunk {
                Ok(bytes) => decoder
                    .push(&bytes)
                    .into_iter()
                    .flat_map(|payload| match deltas.push(&payload) {
                        Ok(texts) => texts.into_iter().map(Ok).collect::<Vec<_>>(),
                        Err(e) => vec![Err(e)],
                    })
                    .collect::<Vec<_>>(),
                Err(e) => {
                    error!(error = ?e, "OpenAI stream interrupted");
                    vec![Err(LlmError::new(format!("OpenAI stream interrupted: {}", e)))]
                }
            })
            .flat_map(futures::stream::iter);

        info!("OpenAI stream opened");
        Ok(Box::pin(fragments))
    }
}

/// Turns chat-completion chunks into text fragments.
///
/// Reasoning deltas are forwarded as they arrive. When a marker is
/// configured it is emitted once, right before the first answer delta.
#[derive(Debug)]
struct ChatDeltas {
    marker: Option<String>,
    answering: bool,
}

impl ChatDeltas {
    fn new(marker: Option<String>) -> Self {
        Self {
            marker,
            answering: false,
        }
    }

    /// Decodes one event payload. `[DONE]` and empty deltas yield nothing.
    fn push(&mut self, payload: &str) -> Result<Vec<String>, LlmError> {
        if payload.trim() == "[DONE]" {
            return Ok(Vec::new());
        }

        let chunk: serde_json::Value = serde_json::from_str(payload).map_err(|e| {
            error!(error = ?e, payload = %payload, "Failed to parse chat chunk");
            LlmError::new(format!("Failed to parse stream chunk: {}", e))
        })?;

        if let Some(message) = chunk["error"]["message"].as_str() {
            return Err(LlmError::new(format!("OpenAI stream error: {}", message)));
        }

        let mut texts = Vec::new();
        for choice in chunk["choices"].as_array().into_iter().flatten() {
            let delta = &choice["delta"];
            if let Some(reasoning) = delta["reasoning_content"].as_str().filter(|t| !t.is_empty()) {
                texts.push(reasoning.to_string());
            }
            if let Some(content) = delta["content"].as_str().filter(|t| !t.is_empty()) {
                if !self.answering {
                    self.answering = true;
                    if let Some(marker) = &self.marker {
                        texts.push(format!("\n\n{}\n", marker));
                    }
                }
                texts.push(content.to_string());
            }
        }
        Ok(texts)
    }
}

/// Extracts the text delta from one Anthropic event payload.
///
/// Non-text events yield `Ok(None)`; `error` events become errors.
fn anthropic_text(payload: &str) -> Result<Option<String>, LlmError> {
    let event: serde_json::Value = serde_json::from_str(payload).map_err(|e| {
        error!(error = ?e, payload = %payload, "Failed to parse Anthropic event");
        LlmError::new(format!("Failed to parse stream event: {}", e))
    })?;

    match event["type"].as_str() {
        Some("content_block_delta") => Ok(event["delta"]["text"].as_str().map(str::to_string)),
        Some("error") => Err(LlmError::new(format!(
            "Anthropic stream error: {}",
            event["error"]["message"].as_str().unwrap_or("unknown error")
        ))),
        _ => Ok(None),
    }
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Bytes may arrive split anywhere, including inside a UTF-8 sequence;
/// only complete lines are decoded.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feeds bytes and returns the data payloads of every completed event.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if !self.data.is_empty() {
                    events.push(self.data.join("\n"));
                    self.data.clear();
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data.push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
        }

        events
    }
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LlmError {
    /// Creates a new LLM error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
