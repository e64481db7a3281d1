//! Knowledge base lookup for incoming questions.
//!
//! Entries are scanned in stored order and the **first** one whose question
//! is equal after normalization, or more similar than the match threshold, is
//! returned. A later entry with a higher score never wins, so KB ordering
//! decides between several plausible paraphrase matches.

use crate::domain::{EdgeCaseEntry, KbEntry, KnowledgeBase};
use crate::similarity::similarity;
use crate::text::normalize;

/// First-match lookup over a [`KnowledgeBase`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    kb: &'a KnowledgeBase,
    threshold: f64,
}

impl<'a> Matcher<'a> {
    /// `threshold` is exclusive: a score equal to it is not a match.
    pub fn new(kb: &'a KnowledgeBase, threshold: f64) -> Self {
        Self { kb, threshold }
    }

    pub fn find_kb_entry(&self, question: &str) -> Option<&'a KbEntry> {
        first_match(self.kb.questions(), question, self.threshold, |e| {
            &e.question
        })
    }

    pub fn find_edge_case(&self, question: &str) -> Option<&'a EdgeCaseEntry> {
        first_match(self.kb.edge_cases(), question, self.threshold, |e| {
            &e.question
        })
    }
}

fn first_match<'e, T>(
    entries: &'e [T],
    question: &str,
    threshold: f64,
    stored_question: impl Fn(&T) -> &str,
) -> Option<&'e T> {
    let wanted = normalize(question);
    entries.iter().find(|entry| {
        let candidate = normalize(stored_question(entry));
        wanted == candidate || similarity(&wanted, &candidate) > threshold
    })
}
