//! Four-way classification of model answers against the knowledge base.

use crate::config::Thresholds;
use crate::domain::{KnowledgeBase, ValidationResult};
use crate::matcher::Matcher;
use crate::similarity::similarity;
use crate::text::normalize;

/// Classifies (question, model answer) pairs.
///
/// - KB question found: CORRECT when the normalized answers score strictly
///   above the answer threshold, HALLUCINATION otherwise.
/// - Otherwise an edge-case match yields EDGE_CASE, and no match at all
///   yields OUT_OF_DOMAIN.
///
/// Every input, empty strings included, is classified.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    matcher: Matcher<'a>,
    answer_threshold: f64,
}

impl<'a> Validator<'a> {
    pub fn new(kb: &'a KnowledgeBase, thresholds: Thresholds) -> Self {
        Self {
            matcher: Matcher::new(kb, thresholds.question_match),
            answer_threshold: thresholds.answer,
        }
    }

    pub fn validate(&self, question: &str, model_answer: &str) -> ValidationResult {
        if let Some(entry) = self.matcher.find_kb_entry(question) {
            let score = similarity(&normalize(model_answer), &normalize(&entry.answer));
            return if score > self.answer_threshold {
                ValidationResult::correct(entry, model_answer, score)
            } else {
                ValidationResult::hallucination(entry, model_answer, score)
            };
        }

        match self.matcher.find_edge_case(question) {
            Some(edge) => ValidationResult::edge_case(edge, model_answer),
            None => ValidationResult::out_of_domain(model_answer),
        }
    }
}
