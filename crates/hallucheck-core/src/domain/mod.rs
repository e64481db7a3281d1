//! Domain models for hallucheck.
//!
//! Canonical definitions for the core entities:
//! - `KnowledgeBase`: ground-truth questions and edge cases
//! - `ValidationResult`: classification of one model answer
//! - `QuestionResult`: attempts recorded for one question

pub mod error;
pub mod knowledge_base;
pub mod result;
pub mod validation;

// Re-export main types and errors
pub use error::{CompletionError, HallucheckError, KnowledgeBaseError, Result};
pub use knowledge_base::{EdgeCaseEntry, EntryId, KbEntry, KnowledgeBase};
pub use result::{Attempt, QuestionKind, QuestionResult, QuestionSource};
pub use validation::{Outcome, ValidationResult, ValidationStatus};
