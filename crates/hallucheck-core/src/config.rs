//! Run configuration: classification thresholds and courtesy delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default pause before re-asking a question whose first answer needs a retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Default pause after each processed question.
pub const DEFAULT_QUESTION_DELAY: Duration = Duration::from_millis(500);

/// Similarity cut-offs. Both comparisons are strict (`>`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum answer similarity (exclusive) for a CORRECT verdict.
    pub answer: f64,
    /// Minimum question similarity (exclusive) for a KB / edge-case match.
    pub question_match: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            answer: 0.7,
            question_match: 0.8,
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub retry_delay: Duration,
    pub question_delay: Duration,
    pub thresholds: Thresholds,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            question_delay: DEFAULT_QUESTION_DELAY,
            thresholds: Thresholds::default(),
        }
    }
}

impl RunConfig {
    /// Defaults overridden by `HALLUCHECK_RETRY_DELAY_MS` and
    /// `HALLUCHECK_QUESTION_DELAY_MS` when set to a valid integer.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            retry_delay: env_millis("HALLUCHECK_RETRY_DELAY_MS").unwrap_or(defaults.retry_delay),
            question_delay: env_millis("HALLUCHECK_QUESTION_DELAY_MS")
                .unwrap_or(defaults.question_delay),
            thresholds: defaults.thresholds,
        }
    }

    /// Zero courtesy delays, for offline runs against a local fake.
    pub fn without_delays() -> Self {
        Self {
            retry_delay: Duration::ZERO,
            question_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_question_delay(mut self, delay: Duration) -> Self {
        self.question_delay = delay;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}
