//! Knowledge base: curated question/answer pairs plus known edge cases.
//!
//! Scan order is significant. Both sequences keep the order of the source
//! document because the matcher returns the first acceptable entry.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::KnowledgeBaseError;

/// Identifier of a knowledge base entry. Source documents use either
/// integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{}", n),
            EntryId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntryId {
    fn from(n: i64) -> Self {
        EntryId::Number(n)
    }
}

impl From<i32> for EntryId {
    fn from(n: i32) -> Self {
        EntryId::Number(i64::from(n))
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId::Text(s.to_string())
    }
}

/// A factual question with its ground-truth answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KbEntry {
    pub id: EntryId,
    pub question: String,
    pub answer: String,
    pub category: String,
}

impl KbEntry {
    pub fn new(
        id: impl Into<EntryId>,
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }
}

/// A question with no good answer (unanswerable, speculative, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeCaseEntry {
    pub id: EntryId,
    pub question: String,
    pub category: String,
    pub reason: String,
}

impl EdgeCaseEntry {
    pub fn new(
        id: impl Into<EntryId>,
        question: impl Into<String>,
        category: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            category: category.into(),
            reason: reason.into(),
        }
    }
}

/// Immutable in-memory knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    questions: Vec<KbEntry>,
    #[serde(default)]
    edge_cases: Vec<EdgeCaseEntry>,
}

impl KnowledgeBase {
    pub fn new(questions: Vec<KbEntry>, edge_cases: Vec<EdgeCaseEntry>) -> Self {
        Self {
            questions,
            edge_cases,
        }
    }

    /// An empty knowledge base. Every question classifies as out of domain.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a knowledge base document. Missing arrays are treated as empty.
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Load a knowledge base from a JSON file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let raw = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| KnowledgeBaseError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a knowledge base, degrading to an empty one on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(kb) => {
                info!(
                    event = "kb.loaded",
                    path = %path.display(),
                    questions = kb.questions.len(),
                    edge_cases = kb.edge_cases.len(),
                );
                kb
            }
            Err(e) => {
                warn!(event = "kb.load_failed", error = %e, "continuing with empty knowledge base");
                Self::empty()
            }
        }
    }

    pub fn questions(&self) -> &[KbEntry] {
        &self.questions
    }

    pub fn edge_cases(&self) -> &[EdgeCaseEntry] {
        &self.edge_cases
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() && self.edge_cases.is_empty()
    }
}
