use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{HallucheckError, QuestionResult};
use crate::summary::RunSummary;

/// Run output written once when a run completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub results: Vec<QuestionResult>,
    pub summary: RunSummary,
    pub timestamp: DateTime<Utc>,
}

impl RunReport {
    /// Build a report, deriving the summary from `results`.
    pub fn new(results: Vec<QuestionResult>) -> Self {
        let summary = RunSummary::from_results(&results);
        Self {
            results,
            summary,
            timestamp: Utc::now(),
        }
    }

    /// Parse a saved report, rejecting results that no run could produce.
    pub fn from_json_str(raw: &str) -> crate::domain::Result<Self> {
        let report: RunReport = serde_json::from_str(raw)?;
        report.check()?;
        Ok(report)
    }

    /// Every result holds one or two attempts, numbered from 1, with a second
    /// attempt exactly when the first verdict asked for a retry.
    pub fn check(&self) -> crate::domain::Result<()> {
        for result in &self.results {
            let invalid = |why: &str| {
                HallucheckError::InvalidReport(format!("{:?}: {}", result.question, why))
            };
            let first = match result.attempts.first() {
                Some(first) => first,
                None => return Err(invalid("no attempts")),
            };
            if result.attempts.len() > 2 {
                return Err(invalid("more than two attempts"));
            }
            for (i, attempt) in result.attempts.iter().enumerate() {
                if attempt.attempt_number as usize != i + 1 {
                    return Err(invalid("attempts out of order"));
                }
            }
            if result.was_retried() != first.validation.retry_needed() {
                return Err(invalid("retry does not follow the first verdict"));
            }
        }
        Ok(())
    }
}

/// Write the run report in pretty JSON format.
pub fn write_run_report_json(path: &Path, report: &RunReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize run report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Read a run report previously written by [`write_run_report_json`].
pub fn read_run_report_json(path: &Path) -> Result<RunReport> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {:?}", path))?;
    RunReport::from_json_str(&raw).with_context(|| format!("parse run report {:?}", path))
}

/// Render the summary block printed at the end of a run.
pub fn render_summary_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("RESULTS SUMMARY\n");
    out.push_str(&"=".repeat(30));
    out.push('\n');
    out.push_str(&format!(
        "Total Questions: {}\nCorrect Answers: {}\nHallucinations Detected: {}\nEdge Cases: {}\nOut of Domain: {}\n",
        summary.total_questions,
        summary.correct_answers,
        summary.hallucinations_detected,
        summary.edge_cases,
        summary.out_of_domain,
    ));
    out.push_str(&format!(
        "Accuracy: {:.1}%\nHallucination Rate: {:.1}%\nRetry Rate: {:.1}%\nTotal Attempts: {}\n",
        summary.accuracy, summary.hallucination_rate, summary.retry_rate, summary.total_attempts,
    ));
    out
}
