//! Domain-level error taxonomy for hallucheck.
//!
//! Nothing here is fatal to a run: the knowledge base degrades to empty and
//! completion failures become error-text answers. Reading a saved run report
//! back is strict and fails with [`HallucheckError`].

use std::path::PathBuf;

/// Errors produced while loading a knowledge base document.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("failed to read knowledge base {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid knowledge base JSON in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced by a completion service call.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("completion service unavailable: {0}")]
    Unavailable(String),
}

/// Umbrella error for hallucheck library operations.
#[derive(Debug, thiserror::Error)]
pub enum HallucheckError {
    #[error("knowledge base error: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),

    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid run report: {0}")]
    InvalidReport(String),
}

/// Result type for hallucheck domain operations.
pub type Result<T> = std::result::Result<T, HallucheckError>;
