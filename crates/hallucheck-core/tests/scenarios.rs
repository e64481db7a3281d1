//! End-to-end detection scenarios over small knowledge bases.

use hallucheck_core::fakes::{RecordingObserver, ScriptedCompletion, ScriptedReply};
use hallucheck_core::{
    summarize, KnowledgeBase, Orchestrator, Outcome, QuestionResult, RunConfig, ValidationStatus,
};

const JAPAN: &str = "What is the capital of Japan?";
const MARS: &str = "What is the population of Mars?";
const WEATHER: &str = "What is the weather today?";

fn scenario_kb() -> KnowledgeBase {
    KnowledgeBase::from_json_str(
        r#"{
            "questions": [
                {"id": 1, "question": "What is the capital of Japan?", "answer": "Tokyo", "category": "geography"}
            ],
            "edge_cases": [
                {"id": 2, "question": "What is the population of Mars?", "category": "unanswerable", "reason": "no humans on Mars"}
            ]
        }"#,
    )
    .expect("valid scenario KB")
}

async fn run(kb: &KnowledgeBase, completion: &ScriptedCompletion) -> Vec<QuestionResult> {
    let observer = RecordingObserver::new();
    Orchestrator::new(kb, completion, &observer, RunConfig::default())
        .run()
        .await
}

fn assert_attempt_invariants(result: &QuestionResult) {
    assert!(
        (1..=2).contains(&result.attempts.len()),
        "{} attempts for {:?}",
        result.attempts.len(),
        result.question
    );
    let first_needs_retry = result.attempts[0].validation.retry_needed();
    assert_eq!(result.attempts.len() == 2, first_needs_retry);
    for (i, attempt) in result.attempts.iter().enumerate() {
        assert_eq!(attempt.attempt_number as usize, i + 1);
        assert_eq!(attempt.model_answer, attempt.validation.model_answer);
        assert_eq!(
            attempt.validation.retry_needed(),
            attempt.validation.status().retry_needed()
        );
        if let Some(s) = attempt.validation.similarity() {
            assert!((0.0..=1.0).contains(&s));
        }
    }
}

/// Scenario A: correct answer, a single attempt.
#[tokio::test(start_paused = true)]
async fn correct_answer_needs_one_attempt() {
    let kb = scenario_kb();
    let completion = ScriptedCompletion::new()
        .with_answers(JAPAN, &["Tokyo", "Tokyo"])
        .with_answer(MARS, "Nobody lives there");

    let results = run(&kb, &completion).await;
    let japan = &results[0];

    assert_attempt_invariants(japan);
    assert_eq!(japan.attempts.len(), 1);
    let validation = &japan.attempts[0].validation;
    assert_eq!(validation.status(), ValidationStatus::Correct);
    assert!(!validation.retry_needed());
}

/// Scenario B: persistent hallucination is retried once and stays flagged.
#[tokio::test(start_paused = true)]
async fn persistent_hallucination_is_retried_once() {
    let kb = scenario_kb();
    let completion = ScriptedCompletion::new().with_answers(JAPAN, &["Beijing", "Beijing"]);

    let results = run(&kb, &completion).await;
    let japan = &results[0];

    assert_attempt_invariants(japan);
    assert_eq!(japan.attempts.len(), 2);
    assert_eq!(
        japan.attempts[0].validation.status(),
        ValidationStatus::Hallucination
    );
    assert!(japan.attempts[0].validation.retry_needed());
    assert_eq!(
        japan.final_validation().map(|v| v.status()),
        Some(ValidationStatus::Hallucination)
    );
    match &japan.attempts[1].validation.outcome {
        Outcome::Hallucination {
            kb_answer, reason, ..
        } => {
            assert_eq!(kb_answer, "Tokyo");
            assert_eq!(reason, "Answer differs from knowledge base");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// Scenario C: any answer to a known edge case is accepted as such.
#[tokio::test(start_paused = true)]
async fn edge_case_is_never_retried() {
    let kb = scenario_kb();
    let completion = ScriptedCompletion::new()
        .with_answer(JAPAN, "Tokyo")
        .with_answer(MARS, "Roughly 4 million colonists");

    let results = run(&kb, &completion).await;
    let mars = &results[1];

    assert_attempt_invariants(mars);
    assert_eq!(mars.attempts.len(), 1);
    let validation = &mars.attempts[0].validation;
    assert_eq!(validation.status(), ValidationStatus::EdgeCase);
    assert!(!validation.retry_needed());
    match &validation.outcome {
        Outcome::EdgeCase { reason, .. } => assert_eq!(reason, "no humans on Mars"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

/// Scenario D: a question outside the KB is out of domain on both attempts.
#[tokio::test(start_paused = true)]
async fn out_of_domain_question_gets_two_attempts() {
    // The question comes from one KB; validation runs against another that
    // has no entry for it.
    let asked = KnowledgeBase::from_json_str(&format!(
        r#"{{"edge_cases": [{{"id": 9, "question": "{}", "category": "x", "reason": "y"}}]}}"#,
        WEATHER
    ))
    .expect("valid KB");
    let known = scenario_kb();
    let completion = ScriptedCompletion::new().with_answers(WEATHER, &["Sunny", "It is raining"]);
    let observer = RecordingObserver::new();

    let orchestrator = Orchestrator::new(&known, &completion, &observer, RunConfig::default());
    let source = hallucheck_core::QuestionSource::EdgeCaseInfo(asked.edge_cases()[0].clone());
    let result = orchestrator.process_question(source).await;

    assert_attempt_invariants(&result);
    assert_eq!(result.attempts.len(), 2);
    for attempt in &result.attempts {
        assert_eq!(attempt.validation.status(), ValidationStatus::OutOfDomain);
        assert!(attempt.validation.retry_needed());
    }
    assert_eq!(observer.retries(), vec![WEATHER.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn empty_kb_produces_empty_run_and_zero_summary() {
    let kb = KnowledgeBase::from_json_str(r#"{"questions":[],"edge_cases":[]}"#).unwrap();
    let completion = ScriptedCompletion::new();

    let results = run(&kb, &completion).await;
    let summary = summarize(&results);

    assert!(results.is_empty());
    assert_eq!(summary.total_questions, 0);
    assert_eq!(summary.accuracy, 0.0);
    assert_eq!(summary.hallucination_rate, 0.0);
    assert_eq!(summary.retry_rate, 0.0);
    assert!(completion.prompts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn completion_outage_still_yields_complete_summary() {
    let kb = scenario_kb();
    let completion = ScriptedCompletion::new()
        .with_fallback(ScriptedReply::Failure("model server down".to_string()));

    let results = run(&kb, &completion).await;
    let summary = summarize(&results);

    assert_eq!(results.len(), 2);
    for result in &results {
        assert_attempt_invariants(result);
        assert!(result.attempts[0].model_answer.starts_with("Error: "));
    }
    // the factual question hallucinates; the edge case is still an edge case
    assert_eq!(summary.hallucinations_detected, 1);
    assert_eq!(summary.edge_cases, 1);
    assert_eq!(summary.total_attempts, 3);
    assert_eq!(summary.retries_needed, 1);
    assert_eq!(summary.retry_rate, 50.0);
    assert_eq!(
        summary.correct_answers
            + summary.hallucinations_detected
            + summary.edge_cases
            + summary.out_of_domain,
        summary.total_questions
    );
}

#[tokio::test(start_paused = true)]
async fn recovered_answer_counts_as_correct() {
    let kb = scenario_kb();
    let completion = ScriptedCompletion::new()
        .with_answers(JAPAN, &["Kyoto", "Tokyo"])
        .with_answer(MARS, "unknown");

    let results = run(&kb, &completion).await;
    let summary = summarize(&results);

    assert_eq!(results[0].attempts.len(), 2);
    assert_eq!(summary.correct_answers, 1);
    assert_eq!(summary.edge_cases, 1);
    assert_eq!(summary.accuracy, 50.0);
    assert_eq!(summary.total_attempts, 3);
}
