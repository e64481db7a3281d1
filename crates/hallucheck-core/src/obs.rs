//! Structured observability hooks for the detection run lifecycle.
//!
//! The orchestrator reports through a [`RunObserver`] handed to it at
//! construction. [`TracingObserver`] forwards every hook to `tracing`, whose
//! subscriber is installed once in `main` (see [`crate::telemetry`]).
//!
//! Events are emitted at `info!` level (warnings for completion failures).
//! For JSON output, run the CLI with `--json`.

use tracing::{info, warn};

use crate::domain::{ValidationResult, ValidationStatus};

/// Run-scoped span tagged with the run_id. The orchestrator instruments the
/// whole run with it so every event carries `run_id`.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("hallucheck.run", run_id = %run_id)
}

/// Sink for run lifecycle events. All hooks default to no-ops.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _run_id: &str, _model: &str, _factual: usize, _edge_cases: usize) {}

    fn question_asked(&self, _question: &str, _attempt: u32) {}

    fn answer_received(&self, _question: &str, _attempt: u32, _answer: &str) {}

    fn completion_failed(&self, _question: &str, _attempt: u32, _error: &dyn std::fmt::Display) {}

    fn answer_validated(&self, _question: &str, _attempt: u32, _validation: &ValidationResult) {}

    fn retry_scheduled(&self, _question: &str, _status: ValidationStatus) {}

    fn run_finished(&self, _run_id: &str, _questions: usize, _duration_ms: u64) {}
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that writes each hook as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn run_started(&self, run_id: &str, model: &str, factual: usize, edge_cases: usize) {
        info!(
            event = "run.started",
            run_id = %run_id,
            model = %model,
            factual = factual,
            edge_cases = edge_cases,
        );
    }

    fn question_asked(&self, question: &str, attempt: u32) {
        info!(event = "question.asked", attempt = attempt, question = %question);
    }

    fn answer_received(&self, _question: &str, attempt: u32, answer: &str) {
        info!(event = "answer.received", attempt = attempt, answer = %answer);
    }

    fn completion_failed(&self, question: &str, attempt: u32, error: &dyn std::fmt::Display) {
        warn!(
            event = "completion.failed",
            attempt = attempt,
            question = %question,
            error = %error,
        );
    }

    fn answer_validated(&self, _question: &str, attempt: u32, validation: &ValidationResult) {
        info!(
            event = "answer.validated",
            attempt = attempt,
            status = %validation.status(),
            similarity = validation.similarity(),
            retry_needed = validation.retry_needed(),
        );
    }

    fn retry_scheduled(&self, question: &str, status: ValidationStatus) {
        info!(event = "question.retry", status = %status, question = %question);
    }

    fn run_finished(&self, run_id: &str, questions: usize, duration_ms: u64) {
        info!(
            event = "run.finished",
            run_id = %run_id,
            questions = questions,
            duration_ms = duration_ms,
        );
    }
}
