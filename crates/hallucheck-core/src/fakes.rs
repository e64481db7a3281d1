//! In-memory fakes for the completion service and the run observer.
//!
//! `ScriptedCompletion` replays canned answers per question and attempt
//! without any model server; `RecordingObserver` captures lifecycle hooks so
//! tests can assert on retry decisions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::completion::{CompletionService, Prompt};
use crate::domain::{CompletionError, ValidationResult, ValidationStatus};
use crate::obs::RunObserver;

// ---------------------------------------------------------------------------
// ScriptedCompletion
// ---------------------------------------------------------------------------

/// One canned reply: an answer or a service failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Answer(String),
    Failure(String),
}

/// Completion service answering from a script keyed by question text.
///
/// The n-th reply of a question's script is used for attempt n; the last
/// reply repeats for later attempts. Questions without a script receive the
/// fallback reply.
#[derive(Debug)]
pub struct ScriptedCompletion {
    scripts: HashMap<String, Vec<ScriptedReply>>,
    fallback: ScriptedReply,
    prompts: Mutex<Vec<Prompt>>,
}

impl Default for ScriptedCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedCompletion {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            fallback: ScriptedReply::Answer(String::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer `question` with `answer` on every attempt.
    pub fn with_answer(self, question: &str, answer: &str) -> Self {
        self.with_answers(question, &[answer])
    }

    /// Answer `question` with `answers[n - 1]` on attempt n.
    pub fn with_answers(mut self, question: &str, answers: &[&str]) -> Self {
        self.scripts.insert(
            question.to_string(),
            answers
                .iter()
                .map(|a| ScriptedReply::Answer(a.to_string()))
                .collect(),
        );
        self
    }

    /// Use an explicit reply sequence for `question`.
    pub fn with_replies(mut self, question: &str, replies: Vec<ScriptedReply>) -> Self {
        self.scripts.insert(question.to_string(), replies);
        self
    }

    /// Reply used for questions without a script.
    pub fn with_fallback(mut self, reply: ScriptedReply) -> Self {
        self.fallback = reply;
        self
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    fn reply_for(&self, prompt: &Prompt) -> ScriptedReply {
        let idx = prompt.attempt_number.saturating_sub(1) as usize;
        self.scripts
            .get(&prompt.question)
            .and_then(|replies| replies.get(idx).or_else(|| replies.last()))
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ask(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        match self.reply_for(prompt) {
            ScriptedReply::Answer(answer) => Ok(answer),
            ScriptedReply::Failure(message) => Err(CompletionError::Unavailable(message)),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// A captured observer hook.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    RunStarted { factual: usize, edge_cases: usize },
    QuestionAsked { question: String, attempt: u32 },
    AnswerReceived { attempt: u32, answer: String },
    CompletionFailed { attempt: u32, error: String },
    AnswerValidated {
        attempt: u32,
        status: ValidationStatus,
    },
    RetryScheduled {
        question: String,
        status: ValidationStatus,
    },
    RunFinished { questions: usize },
}

/// Observer that records every hook in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn retries(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::RetryScheduled { question, .. } => Some(question),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RunObserver for RecordingObserver {
    fn run_started(&self, _run_id: &str, _model: &str, factual: usize, edge_cases: usize) {
        self.push(ObservedEvent::RunStarted {
            factual,
            edge_cases,
        });
    }

    fn question_asked(&self, question: &str, attempt: u32) {
        self.push(ObservedEvent::QuestionAsked {
            question: question.to_string(),
            attempt,
        });
    }

    fn answer_received(&self, _question: &str, attempt: u32, answer: &str) {
        self.push(ObservedEvent::AnswerReceived {
            attempt,
            answer: answer.to_string(),
        });
    }

    fn completion_failed(&self, _question: &str, attempt: u32, error: &dyn std::fmt::Display) {
        self.push(ObservedEvent::CompletionFailed {
            attempt,
            error: error.to_string(),
        });
    }

    fn answer_validated(&self, _question: &str, attempt: u32, validation: &ValidationResult) {
        self.push(ObservedEvent::AnswerValidated {
            attempt,
            status: validation.status(),
        });
    }

    fn retry_scheduled(&self, question: &str, status: ValidationStatus) {
        self.push(ObservedEvent::RetryScheduled {
            question: question.to_string(),
            status,
        });
    }

    fn run_finished(&self, _run_id: &str, questions: usize, _duration_ms: u64) {
        self.push(ObservedEvent::RunFinished { questions });
    }
}
