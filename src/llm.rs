//! LLM client abstraction and OpenAI-compatible chat completion implementation.
//!
//! This module provides a generic [`LlmClient`] trait for interacting with
//! text-generation providers, along with concrete implementations:
//!
//! - [`OpenAiClient`]: production client for any OpenAI-compatible
//!   `/chat/completions` endpoint
//! - [`MockLlmClient`]: test double for unit tests
//!
//! Used by the augmentation gateway. Provider output is untrusted; callers are
//! expected to validate whatever text comes back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP or network error occurred.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered with a non-success status code.
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Failed to parse the API response envelope.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Model returned no text content.
    #[error("Model returned empty response")]
    EmptyResponse,

    /// The provider did not answer within the configured deadline.
    #[error("Provider call timed out after {0:?}")]
    Timeout(std::time::Duration),
}

// ============================================================================
// Request / Completion Types
// ============================================================================

/// A single prompt with its generation budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The user prompt sent to the model.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// The result of a successful LLM completion request.
#[derive(Debug, Clone)]
pub struct Completion {
    /// The generated text from the model.
    pub text: String,
}

// ============================================================================
// LlmClient Trait
// ============================================================================

/// Generic interface for LLM clients.
///
/// Supports single-prompt completion with a per-request token budget and
/// temperature.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for the given request.
    ///
    /// # Returns
    ///
    /// A [`Completion`] containing the model's response text.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;
}

// ============================================================================
// OpenAI-compatible Implementation
// ============================================================================

/// Default model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for OpenAI-compatible chat completion APIs.
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

/// A message in the conversation.
#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new client with an explicit API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (trailing slashes are ignored).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        Ok(Completion { text })
    }
}

// ============================================================================
// Mock Implementation (Test Only)
// ============================================================================

/// Mock LLM client for testing. Returns pre-programmed results in FIFO order
/// and records every request it receives.
#[cfg(test)]
pub struct MockLlmClient {
    /// Pre-programmed results to return in FIFO order.
    pub responses: std::sync::Mutex<std::collections::VecDeque<Result<String, LlmError>>>,
    /// Requests seen so far, in call order.
    pub requests: std::sync::Mutex<Vec<CompletionRequest>>,
}

#[cfg(test)]
impl MockLlmClient {
    /// Create a new mock client with a sequence of successful responses.
    ///
    /// # Panics
    ///
    /// Panics if [`complete`](LlmClient::complete) is called more times
    /// than there are responses.
    pub fn new(responses: Vec<String>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    /// Create a mock that may also yield errors.
    pub fn with_results(results: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(results.into()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let text = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockLlmClient: no more responses available")?;

        Ok(Completion { text })
    }
}

/// Test client that never answers, for exercising timeouts.
#[cfg(test)]
pub struct StalledLlmClient;

#[cfg(test)]
#[async_trait]
impl LlmClient for StalledLlmClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, LlmError> {
        std::future::pending().await
    }
}

// ============================================================================
// Tests
// ============================================================================
