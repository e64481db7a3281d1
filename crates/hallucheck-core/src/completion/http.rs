//! HTTP completion backend for a local model server.
//!
//! Speaks the `/api/generate` JSON protocol (non-streaming) used by local
//! inference servers such as Ollama.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionService, Prompt, DEFAULT_RETRY_MARKER};
use crate::domain::CompletionError;

/// Marker the model is asked to continue from, and the split point for
/// extracting its answer.
const ANSWER_MARKER: &str = "Answer:";

/// Completion backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Server base URL.
    pub endpoint: String,
    /// Model name passed to the server.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Prefix put in front of the question on retry attempts.
    pub retry_marker: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        CompletionConfig {
            endpoint: std::env::var("HALLUCHECK_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("HALLUCHECK_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            temperature: 0.7,
            max_tokens: 64,
            retry_marker: DEFAULT_RETRY_MARKER.to_string(),
        }
    }
}

impl CompletionConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific server and model
    pub fn new(endpoint: &str, model: &str) -> Self {
        CompletionConfig {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_retry_marker(mut self, marker: &str) -> Self {
        self.retry_marker = marker.to_string();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Completion service backed by a model server.
pub struct HttpCompletionService {
    config: CompletionConfig,
    http_client: reqwest::Client,
}

impl HttpCompletionService {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("hallucheck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpCompletionService {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(CompletionConfig::from_env())
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn request_body(&self, prompt: &Prompt) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.config.model,
            prompt: frame_prompt(&prompt.render(&self.config.retry_marker)),
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn ask(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        let url = self.config.generate_url();
        let body = self.request_body(prompt);
        debug!(url = %url, attempt = prompt.attempt_number, "sending completion request");

        let response = self.http_client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        Ok(extract_answer(&generated.response))
    }
}

/// Frame the question the way the model is expected to continue it.
pub fn frame_prompt(question: &str) -> String {
    format!("Question: {}\n{}", question, ANSWER_MARKER)
}

/// Keep only the text after the last answer marker, trimmed. Models that echo
/// the framed prompt back are handled the same as those that do not.
pub fn extract_answer(generated: &str) -> String {
    generated
        .rsplit(ANSWER_MARKER)
        .next()
        .unwrap_or(generated)
        .trim()
        .to_string()
}
