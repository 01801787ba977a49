//! Scoring criteria for transcripts

pub mod filler;
pub mod keywords;
pub mod length;
pub mod relevance;
pub mod sentence_structure;
pub mod vocabulary;

pub use filler::FillerCriterion;
pub use keywords::KeywordCriterion;
pub use length::LengthCriterion;
pub use relevance::{LexicalOverlap, RelevanceCriterion, SimilarityBackend};
pub use sentence_structure::SentenceStructureCriterion;
pub use vocabulary::VocabularyCriterion;

use crate::tokenizer::TokenStream;
use crate::Metric;

/// Feedback shared by every criterion when the transcript has no words
pub const NO_CONTENT_FEEDBACK: &str = "No content to evaluate";

/// Output of a single criterion before the engine rounds the score
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    pub metric: Metric,
    /// Normalized score in [0, 100]
    pub score: f64,
    pub feedback: String,
}

impl RawResult {
    pub fn new(metric: Metric, score: f64, feedback: impl Into<String>) -> Self {
        Self {
            metric,
            score,
            feedback: feedback.into(),
        }
    }

    /// Zero score for an empty token stream
    pub fn no_content(metric: Metric) -> Self {
        Self::new(metric, 0.0, NO_CONTENT_FEEDBACK)
    }
}

/// Trait for scoring criteria
///
/// Implementations must be total: `evaluate` returns a score in [0, 100] for
/// every token stream, including one with no words or no sentences.
pub trait Criterion: Send + Sync {
    /// Display name, unique within a registry
    fn name(&self) -> &str;

    /// What the raw metric measures (e.g. "word count")
    fn metric_label(&self) -> &str;

    /// Compute the raw metric, normalized score and feedback
    fn evaluate(&self, tokens: &TokenStream) -> RawResult;
}

/// Round to a fixed number of decimals so reports serialize stably
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 2), 0.12);
        assert_eq!(round_to(0.125, 3), 0.125);
        assert_eq!(round_to(17.25, 1), 17.3);
        assert_eq!(round_to(3.0, 2), 3.0);
    }

    #[test]
    fn test_no_content_result() {
        let result = RawResult::no_content(Metric::Integer(0));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.feedback, NO_CONTENT_FEEDBACK);
    }
}
