//! Run-level statistics derived from the final attempt of every question.

use serde::{Deserialize, Serialize};

use crate::domain::{QuestionResult, ValidationStatus};

/// Snapshot of a run's outcome. Rates are percentages in `[0, 100]` and are 0
/// for an empty run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub hallucinations_detected: usize,
    pub edge_cases: usize,
    pub out_of_domain: usize,
    pub accuracy: f64,
    pub hallucination_rate: f64,
    pub total_attempts: usize,
    pub retries_needed: usize,
    pub retry_rate: f64,
}

impl RunSummary {
    /// Reduce `results` to a summary. Earlier attempts only count towards
    /// `total_attempts`; the verdict of each question is its last attempt.
    pub fn from_results(results: &[QuestionResult]) -> Self {
        let mut summary = RunSummary {
            total_questions: results.len(),
            ..Self::default()
        };

        for result in results {
            summary.total_attempts += result.attempts.len();
            if result.was_retried() {
                summary.retries_needed += 1;
            }
            match result.final_validation().map(|v| v.status()) {
                Some(ValidationStatus::Correct) => summary.correct_answers += 1,
                Some(ValidationStatus::Hallucination) => summary.hallucinations_detected += 1,
                Some(ValidationStatus::EdgeCase) => summary.edge_cases += 1,
                Some(ValidationStatus::OutOfDomain) | None => summary.out_of_domain += 1,
            }
        }

        let total = summary.total_questions;
        summary.accuracy = percent(summary.correct_answers, total);
        summary.hallucination_rate = percent(summary.hallucinations_detected, total);
        summary.retry_rate = percent(summary.retries_needed, total);
        summary
    }
}

/// Shorthand for [`RunSummary::from_results`].
pub fn summarize(results: &[QuestionResult]) -> RunSummary {
    RunSummary::from_results(results)
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
