//! Vocabulary diversity criterion (type-token ratio)

use super::{round_to, Criterion, RawResult};
use crate::analyzer::scoring::clamp_score;
use crate::tokenizer::TokenStream;
use crate::Metric;

const RICH_RATIO: f64 = 0.6;
const MODERATE_RATIO: f64 = 0.4;

/// Scores the share of distinct words in the transcript
#[derive(Debug, Clone)]
pub struct VocabularyCriterion {
    name: String,
}

impl VocabularyCriterion {
    pub fn new() -> Self {
        Self {
            name: "Vocabulary Diversity".to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for VocabularyCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl Criterion for VocabularyCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_label(&self) -> &str {
        "type-token ratio"
    }

    fn evaluate(&self, tokens: &TokenStream) -> RawResult {
        let total = tokens.word_count();
        if total == 0 {
            return RawResult::no_content(Metric::Decimal(0.0));
        }

        let ratio = tokens.unique_word_count() as f64 / total as f64;
        let percent = (ratio * 100.0).round();
        let feedback = if ratio >= RICH_RATIO {
            format!("Rich vocabulary: {}% unique words", percent)
        } else if ratio >= MODERATE_RATIO {
            format!("Moderate vocabulary variety: {}% unique words", percent)
        } else {
            format!("Repetitive vocabulary: only {}% unique words", percent)
        };

        RawResult::new(
            Metric::Decimal(round_to(ratio, 2)),
            clamp_score(ratio * 100.0),
            feedback,
        )
    }
}
