//! Hallucheck Core Library
//!
//! Knowledge-base backed hallucination detection for language model answers:
//! normalize and score text, match questions against a curated knowledge
//! base, classify each answer, retry once when warranted and summarize the run.

pub mod completion;
pub mod config;
pub mod domain;
pub mod fakes;
pub mod matcher;
pub mod obs;
pub mod orchestrator;
pub mod reporting;
pub mod similarity;
pub mod summary;
pub mod telemetry;
pub mod text;
pub mod validator;

pub use completion::{
    CompletionConfig, CompletionService, HttpCompletionService, Prompt, DEFAULT_RETRY_MARKER,
};
pub use config::{RunConfig, Thresholds};
pub use domain::{
    Attempt, CompletionError, EdgeCaseEntry, EntryId, HallucheckError, KbEntry, KnowledgeBase,
    KnowledgeBaseError, Outcome, QuestionKind, QuestionResult, QuestionSource, Result,
    ValidationResult, ValidationStatus,
};
pub use matcher::Matcher;
pub use obs::{run_span, NoopObserver, RunObserver, TracingObserver};
pub use orchestrator::Orchestrator;
pub use reporting::{read_run_report_json, render_summary_text, write_run_report_json, RunReport};
pub use similarity::similarity;
pub use summary::{summarize, RunSummary};
pub use telemetry::init_tracing;
pub use text::normalize;
pub use validator::Validator;

/// Hallucheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
