//! Per-question result records produced by the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::knowledge_base::{EdgeCaseEntry, KbEntry};
use super::validation::ValidationResult;

/// One ask-and-validate round for a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// 1 for the first ask, 2 for the retry.
    pub attempt_number: u32,
    pub model_answer: String,
    pub validation: ValidationResult,
}

/// Which batch of the knowledge base a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Factual,
    EdgeCase,
}

/// The knowledge base entry a question was drawn from. Serialized as a
/// `kb_info` or `edge_case_info` key next to the other result fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
    KbInfo(KbEntry),
    EdgeCaseInfo(EdgeCaseEntry),
}

impl QuestionSource {
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionSource::KbInfo(_) => QuestionKind::Factual,
            QuestionSource::EdgeCaseInfo(_) => QuestionKind::EdgeCase,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            QuestionSource::KbInfo(entry) => &entry.question,
            QuestionSource::EdgeCaseInfo(edge) => &edge.question,
        }
    }
}

/// Everything recorded for one processed question. Holds one or two attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub question_type: QuestionKind,
    pub timestamp: DateTime<Utc>,
    pub attempts: Vec<Attempt>,
    #[serde(flatten)]
    pub source: QuestionSource,
}

impl QuestionResult {
    pub fn final_attempt(&self) -> Option<&Attempt> {
        self.attempts.last()
    }

    pub fn final_validation(&self) -> Option<&ValidationResult> {
        self.final_attempt().map(|a| &a.validation)
    }

    pub fn was_retried(&self) -> bool {
        self.attempts.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> QuestionResult {
        let entry = KbEntry::new(1, "What is the capital of Japan?", "Tokyo", "geography");
        QuestionResult {
            question: entry.question.clone(),
            question_type: QuestionKind::Factual,
            timestamp: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("parse RFC3339")
                .with_timezone(&Utc),
            attempts: vec![Attempt {
                attempt_number: 1,
                model_answer: "Tokyo".to_string(),
                validation: ValidationResult::correct(&entry, "Tokyo", 1.0),
            }],
            source: QuestionSource::KbInfo(entry),
        }
    }

    #[test]
    fn test_question_result_json_keys() {
        let v = serde_json::to_value(sample()).expect("serialize");
        let obj = v.as_object().expect("object");
        for key in [
            "question",
            "question_type",
            "timestamp",
            "attempts",
            "kb_info",
        ] {
            assert!(obj.contains_key(key), "missing key: {}", key);
        }
        assert!(!obj.contains_key("edge_case_info"));
        assert_eq!(v["question_type"], json!("factual"));
        assert_eq!(v["kb_info"]["answer"], json!("Tokyo"));
        assert_eq!(v["attempts"][0]["validation"]["status"], json!("CORRECT"));
    }

    #[test]
    fn test_question_result_reads_back() {
        let result = sample();
        let raw = serde_json::to_string(&result).expect("serialize");
        let back: QuestionResult = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, result);
    }

    #[test]
    fn test_final_attempt_and_retry_flag() {
        let result = sample();
        assert_eq!(result.final_attempt().map(|a| a.attempt_number), Some(1));
        assert!(!result.was_retried());
    }

    #[test]
    fn test_source_kind_matches_batch() {
        let edge = EdgeCaseEntry::new(2, "What is the population of Mars?", "unanswerable", "none");
        let source = QuestionSource::EdgeCaseInfo(edge);
        assert_eq!(source.kind(), QuestionKind::EdgeCase);
        assert_eq!(source.question(), "What is the population of Mars?");
    }
}
