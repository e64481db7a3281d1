//! Observability tests for the detection run lifecycle.
//!
//! These tests verify that structured tracing events are emitted for each
//! question asked, each answer, each validation and each retry decision.

use hallucheck_core::fakes::ScriptedCompletion;
use hallucheck_core::{
    run_span, KbEntry, KnowledgeBase, Orchestrator, RunConfig, RunObserver, TracingObserver,
    ValidationResult, ValidationStatus,
};
use tracing_test::traced_test;

/// Test: question and answer hooks are logged with their event names
#[traced_test]
#[test]
fn test_tracing_observer_logs_question_and_answer() {
    let observer = TracingObserver;
    observer.question_asked("What is the capital of Japan?", 1);
    observer.answer_received("What is the capital of Japan?", 1, "Tokyo");

    assert!(logs_contain("question.asked"));
    assert!(logs_contain("answer.received"));
    assert!(logs_contain("Tokyo"));
}

/// Test: validation verdicts are logged with their status
#[traced_test]
#[test]
fn test_tracing_observer_logs_validation_status() {
    let observer = TracingObserver;
    observer.answer_validated("q", 2, &ValidationResult::out_of_domain("sunny"));

    assert!(logs_contain("answer.validated"));
    assert!(logs_contain("OUT_OF_DOMAIN"));
}

/// Test: completion failures are logged at warn level
#[traced_test]
#[test]
fn test_tracing_observer_logs_completion_failure() {
    let observer = TracingObserver;
    observer.completion_failed("q", 1, &"connection refused");

    assert!(logs_contain("completion.failed"));
    assert!(logs_contain("WARN"));
}

/// Test: retry decisions are logged
#[traced_test]
#[test]
fn test_tracing_observer_logs_retry() {
    let observer = TracingObserver;
    observer.retry_scheduled("What is the weather today?", ValidationStatus::OutOfDomain);

    assert!(logs_contain("question.retry"));
}

/// Test: run_span creates an enterable span without panicking
#[traced_test]
#[test]
fn test_run_span_enter_creates_span() {
    let _entered = run_span("test-span-run").entered();
    tracing::info!("inside run span");

    assert!(logs_contain("test-span-run"));
}

/// Test: a full run through the tracing observer logs start, retry and finish
#[tokio::test(start_paused = true)]
#[traced_test]
async fn test_full_run_emits_lifecycle_events() {
    let japan = KbEntry::new(1, "What is the capital of Japan?", "Tokyo", "geography");
    let kb = KnowledgeBase::new(vec![japan], vec![]);
    let completion = ScriptedCompletion::new().with_answer("What is the capital of Japan?", "Lima");
    let observer = TracingObserver;

    let results = Orchestrator::new(&kb, &completion, &observer, RunConfig::default())
        .run()
        .await;

    assert_eq!(results.len(), 1);
    assert!(logs_contain("run.started"));
    assert!(logs_contain("question.retry"));
    assert!(logs_contain("HALLUCINATION"));
    assert!(logs_contain("run.finished"));
}
