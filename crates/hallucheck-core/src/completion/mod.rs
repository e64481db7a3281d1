//! Completion service abstraction: the model under test.
//!
//! The orchestrator only sees [`CompletionService`]. Implementations:
//! - [`HttpCompletionService`]: a local model server over HTTP
//! - [`crate::fakes::ScriptedCompletion`]: canned answers for tests and dry runs

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::CompletionError;

pub use http::{CompletionConfig, HttpCompletionService};

/// Default marker prefixed to the question text on retry attempts.
pub const DEFAULT_RETRY_MARKER: &str = "RETRY: ";

/// A question to put to the model, tagged with the attempt it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub question: String,
    /// 1 for the first ask; anything above marks a retry.
    pub attempt_number: u32,
}

impl Prompt {
    pub fn first(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            attempt_number: 1,
        }
    }

    pub fn retry(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            attempt_number: 2,
        }
    }

    pub fn is_retry(&self) -> bool {
        self.attempt_number > 1
    }

    /// Question text as sent to a text-only model: retries carry `marker`
    /// in front of the question.
    pub fn render(&self, marker: &str) -> String {
        if self.is_retry() {
            format!("{}{}", marker, self.question)
        } else {
            self.question.clone()
        }
    }
}

/// The model under test.
///
/// Calls are awaited one at a time by the orchestrator. No timeout is applied
/// around `ask`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Short label for logs (model name, "scripted", ...).
    fn name(&self) -> &str;

    /// Produce a free-text answer for the prompt.
    async fn ask(&self, prompt: &Prompt) -> Result<String, CompletionError>;
}
