//! Validation outcomes for a (question, model answer) pair.

use serde::{Deserialize, Serialize};

use super::knowledge_base::{EdgeCaseEntry, EntryId, KbEntry};

/// Reason attached to a hallucination verdict.
pub const REASON_ANSWER_DIFFERS: &str = "Answer differs from knowledge base";

/// Reason attached to an out-of-domain verdict.
pub const REASON_NOT_IN_KB: &str = "Question not in knowledge base";

/// The four classification outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Correct,
    Hallucination,
    EdgeCase,
    OutOfDomain,
}

impl ValidationStatus {
    /// Hallucinations and out-of-domain answers earn one more attempt.
    pub fn retry_needed(self) -> bool {
        matches!(
            self,
            ValidationStatus::Hallucination | ValidationStatus::OutOfDomain
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Correct => "CORRECT",
            ValidationStatus::Hallucination => "HALLUCINATION",
            ValidationStatus::EdgeCase => "EDGE_CASE",
            ValidationStatus::OutOfDomain => "OUT_OF_DOMAIN",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status-specific payload of a validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Correct {
        question_id: EntryId,
        kb_answer: String,
        similarity: f64,
        category: String,
    },
    Hallucination {
        question_id: EntryId,
        kb_answer: String,
        similarity: f64,
        category: String,
        reason: String,
    },
    EdgeCase {
        edge_case_id: EntryId,
        category: String,
        reason: String,
    },
    OutOfDomain {
        reason: String,
    },
}

impl Outcome {
    pub fn status(&self) -> ValidationStatus {
        match self {
            Outcome::Correct { .. } => ValidationStatus::Correct,
            Outcome::Hallucination { .. } => ValidationStatus::Hallucination,
            Outcome::EdgeCase { .. } => ValidationStatus::EdgeCase,
            Outcome::OutOfDomain { .. } => ValidationStatus::OutOfDomain,
        }
    }
}

/// Classification of one model answer.
///
/// `retry_needed` is derived from the outcome when the value is built (or
/// deserialized) and cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ValidationRecord")]
pub struct ValidationResult {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub model_answer: String,
    retry_needed: bool,
}

#[derive(Deserialize)]
struct ValidationRecord {
    #[serde(flatten)]
    outcome: Outcome,
    model_answer: String,
}

impl From<ValidationRecord> for ValidationResult {
    fn from(record: ValidationRecord) -> Self {
        ValidationResult::new(record.outcome, record.model_answer)
    }
}

impl ValidationResult {
    pub fn new(outcome: Outcome, model_answer: impl Into<String>) -> Self {
        let retry_needed = outcome.status().retry_needed();
        Self {
            outcome,
            model_answer: model_answer.into(),
            retry_needed,
        }
    }

    pub fn correct(entry: &KbEntry, model_answer: &str, similarity: f64) -> Self {
        Self::new(
            Outcome::Correct {
                question_id: entry.id.clone(),
                kb_answer: entry.answer.clone(),
                similarity,
                category: entry.category.clone(),
            },
            model_answer,
        )
    }

    pub fn hallucination(entry: &KbEntry, model_answer: &str, similarity: f64) -> Self {
        Self::new(
            Outcome::Hallucination {
                question_id: entry.id.clone(),
                kb_answer: entry.answer.clone(),
                similarity,
                category: entry.category.clone(),
                reason: REASON_ANSWER_DIFFERS.to_string(),
            },
            model_answer,
        )
    }

    pub fn edge_case(edge: &EdgeCaseEntry, model_answer: &str) -> Self {
        Self::new(
            Outcome::EdgeCase {
                edge_case_id: edge.id.clone(),
                category: edge.category.clone(),
                reason: edge.reason.clone(),
            },
            model_answer,
        )
    }

    pub fn out_of_domain(model_answer: &str) -> Self {
        Self::new(
            Outcome::OutOfDomain {
                reason: REASON_NOT_IN_KB.to_string(),
            },
            model_answer,
        )
    }

    pub fn status(&self) -> ValidationStatus {
        self.outcome.status()
    }

    pub fn retry_needed(&self) -> bool {
        self.retry_needed
    }

    /// Answer similarity, present only for verdicts against a KB entry.
    pub fn similarity(&self) -> Option<f64> {
        match &self.outcome {
            Outcome::Correct { similarity, .. } | Outcome::Hallucination { similarity, .. } => {
                Some(*similarity)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn japan() -> KbEntry {
        KbEntry::new(1, "What is the capital of Japan?", "Tokyo", "geography")
    }

    #[test]
    fn test_retry_needed_follows_status() {
        let entry = japan();
        let edge = EdgeCaseEntry::new(2, "What is the population of Mars?", "unanswerable", "none");

        assert!(!ValidationResult::correct(&entry, "Tokyo", 1.0).retry_needed());
        assert!(ValidationResult::hallucination(&entry, "Beijing", 0.1).retry_needed());
        assert!(!ValidationResult::edge_case(&edge, "nobody").retry_needed());
        assert!(ValidationResult::out_of_domain("sunny").retry_needed());
    }

    #[test]
    fn test_serialized_shape_is_flat_and_tagged() {
        let v = serde_json::to_value(ValidationResult::hallucination(&japan(), "Beijing", 0.25))
            .unwrap();
        assert_eq!(v["status"], json!("HALLUCINATION"));
        assert_eq!(v["question_id"], json!(1));
        assert_eq!(v["kb_answer"], json!("Tokyo"));
        assert_eq!(v["model_answer"], json!("Beijing"));
        assert_eq!(v["similarity"], json!(0.25));
        assert_eq!(v["category"], json!("geography"));
        assert_eq!(v["retry_needed"], json!(true));
        assert_eq!(v["reason"], json!(REASON_ANSWER_DIFFERS));
    }

    #[test]
    fn test_deserialize_recomputes_retry_flag() {
        let raw = json!({
            "status": "OUT_OF_DOMAIN",
            "reason": REASON_NOT_IN_KB,
            "model_answer": "no idea",
            "retry_needed": false
        });
        let result: ValidationResult = serde_json::from_value(raw).unwrap();
        assert_eq!(result.status(), ValidationStatus::OutOfDomain);
        assert!(result.retry_needed());
    }

    #[test]
    fn test_similarity_only_for_kb_verdicts() {
        assert_eq!(
            ValidationResult::correct(&japan(), "Tokyo", 1.0).similarity(),
            Some(1.0)
        );
        assert_eq!(ValidationResult::out_of_domain("x").similarity(), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ValidationStatus::EdgeCase.to_string(), "EDGE_CASE");
        assert_eq!(ValidationStatus::OutOfDomain.to_string(), "OUT_OF_DOMAIN");
    }
}
