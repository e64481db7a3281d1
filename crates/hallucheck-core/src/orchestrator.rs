//! Per-question ask -> validate -> retry loop.
//!
//! Questions are processed strictly one after another: every factual question
//! first, then every edge case, each in stored order. A question whose first
//! answer needs a retry is asked exactly once more after the retry delay; the
//! second attempt is recorded whatever its verdict. A question delay follows
//! every question to keep load on the completion service low.

use chrono::Utc;
use tokio::time::{sleep, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::completion::{CompletionService, Prompt};
use crate::config::RunConfig;
use crate::domain::{Attempt, KnowledgeBase, QuestionResult, QuestionSource};
use crate::obs::{run_span, RunObserver};
use crate::validator::Validator;

/// Drives a detection run over a knowledge base.
pub struct Orchestrator<'a> {
    kb: &'a KnowledgeBase,
    completion: &'a dyn CompletionService,
    observer: &'a dyn RunObserver,
    config: RunConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        kb: &'a KnowledgeBase,
        completion: &'a dyn CompletionService,
        observer: &'a dyn RunObserver,
        config: RunConfig,
    ) -> Self {
        Self {
            kb,
            completion,
            observer,
            config,
        }
    }

    fn validator(&self) -> Validator<'a> {
        Validator::new(self.kb, self.config.thresholds)
    }

    /// Process every knowledge base question and return one result each.
    ///
    /// Never fails: completion errors are recorded as answers.
    pub async fn run(&self) -> Vec<QuestionResult> {
        let run_id = Uuid::new_v4().to_string();
        self.run_inner(&run_id).instrument(run_span(&run_id)).await
    }

    async fn run_inner(&self, run_id: &str) -> Vec<QuestionResult> {
        let started = Instant::now();
        self.observer.run_started(
            run_id,
            self.completion.name(),
            self.kb.questions().len(),
            self.kb.edge_cases().len(),
        );

        let sources = self
            .kb
            .questions()
            .iter()
            .cloned()
            .map(QuestionSource::KbInfo)
            .chain(
                self.kb
                    .edge_cases()
                    .iter()
                    .cloned()
                    .map(QuestionSource::EdgeCaseInfo),
            );

        let total = self.kb.questions().len() + self.kb.edge_cases().len();
        let mut results = Vec::with_capacity(total);
        for source in sources {
            results.push(self.process_question(source).await);
            sleep(self.config.question_delay).await;
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        self.observer.run_finished(run_id, results.len(), duration_ms);
        results
    }

    /// Ask one question, retrying once when the first verdict calls for it.
    pub async fn process_question(&self, source: QuestionSource) -> QuestionResult {
        let question = source.question().to_string();
        let timestamp = Utc::now();
        let mut attempts = Vec::with_capacity(2);

        let first = self.attempt(Prompt::first(question.as_str())).await;
        let retry_status = first
            .validation
            .retry_needed()
            .then(|| first.validation.status());
        attempts.push(first);

        if let Some(status) = retry_status {
            self.observer.retry_scheduled(&question, status);
            sleep(self.config.retry_delay).await;
            attempts.push(self.attempt(Prompt::retry(question.as_str())).await);
        }

        QuestionResult {
            question,
            question_type: source.kind(),
            timestamp,
            attempts,
            source,
        }
    }

    async fn attempt(&self, prompt: Prompt) -> Attempt {
        self.observer.question_asked(&prompt.question, prompt.attempt_number);

        let model_answer = match self.completion.ask(&prompt).await {
            Ok(answer) => {
                self.observer.answer_received(&prompt.question, prompt.attempt_number, &answer);
                answer
            }
            Err(e) => {
                self.observer.completion_failed(&prompt.question, prompt.attempt_number, &e);
                format!("Error: {}", e)
            }
        };

        let validation = self.validator().validate(&prompt.question, &model_answer);
        self.observer.answer_validated(&prompt.question, prompt.attempt_number, &validation);

        Attempt {
            attempt_number: prompt.attempt_number,
            model_answer,
            validation,
        }
    }
}
