//! Length / completeness criterion
//!
//! Scores the word count against a `[min, ideal, max]` target range:
//! nothing below `min`, a linear ramp up to `ideal`, a plateau up to `max`,
//! then a linear decay to a floor at twice `max`.

use super::{Criterion, RawResult};
use crate::analyzer::scoring::linear_ramp;
use crate::error::ScoringError;
use crate::tokenizer::TokenStream;
use crate::Metric;

pub const DEFAULT_MIN_WORDS: usize = 30;
pub const DEFAULT_IDEAL_WORDS: usize = 120;
pub const DEFAULT_MAX_WORDS: usize = 250;

/// Score reached at twice the maximum and kept beyond it
const VERBOSE_FLOOR: f64 = 40.0;

/// Scores how complete the transcript is by word count
#[derive(Debug, Clone)]
pub struct LengthCriterion {
    name: String,
    min_words: usize,
    ideal_words: usize,
    max_words: usize,
}

impl LengthCriterion {
    pub fn new() -> Self {
        Self {
            name: "Length".to_string(),
            min_words: DEFAULT_MIN_WORDS,
            ideal_words: DEFAULT_IDEAL_WORDS,
            max_words: DEFAULT_MAX_WORDS,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the target range. Requires `min < ideal <= max`.
    pub fn with_range(mut self, min: usize, ideal: usize, max: usize) -> Result<Self, ScoringError> {
        if min >= ideal || ideal > max {
            return Err(ScoringError::configuration(format!(
                "criterion '{}': length range needs min < ideal <= max (got {}/{}/{})",
                self.name, min, ideal, max
            )));
        }
        self.min_words = min;
        self.ideal_words = ideal;
        self.max_words = max;
        Ok(self)
    }

    fn score_for(&self, count: usize) -> f64 {
        let n = count as f64;
        let max = self.max_words as f64;

        if count < self.min_words {
            0.0
        } else if count < self.ideal_words {
            linear_ramp(n, self.min_words as f64, self.ideal_words as f64)
        } else if count <= self.max_words {
            100.0
        } else {
            let overshoot = (n - max) / max;
            (100.0 - overshoot * (100.0 - VERBOSE_FLOOR)).max(VERBOSE_FLOOR)
        }
    }

    fn feedback_for(&self, count: usize) -> String {
        if count < self.min_words {
            format!(
                "Too short: {} words (needs at least {})",
                count, self.min_words
            )
        } else if count < self.ideal_words {
            format!(
                "Adequate length: {} words, aim for about {}",
                count, self.ideal_words
            )
        } else if count <= self.max_words {
            format!("Good length: {} words", count)
        } else {
            format!("Verbose: {} words (limit {})", count, self.max_words)
        }
    }
}

impl Default for LengthCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl Criterion for LengthCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_label(&self) -> &str {
        "word count"
    }

    fn evaluate(&self, tokens: &TokenStream) -> RawResult {
        let count = tokens.word_count();
        let metric = Metric::Integer(count as u64);
        if count == 0 {
            return RawResult::no_content(metric);
        }
        RawResult::new(metric, self.score_for(count), self.feedback_for(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_defaults() {
        let criterion = LengthCriterion::new();
        assert_eq!(criterion.name(), "Length");
        assert_eq!(criterion.metric_label(), "word count");
    }

    #[test]
    fn test_too_short_scores_zero() {
        let result = LengthCriterion::new().evaluate(&tokenize(&words(10)));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.metric, Metric::Integer(10));
        assert!(result.feedback.starts_with("Too short"));
    }

    #[test]
    fn test_ramp_between_min_and_ideal() {
        let criterion = LengthCriterion::new();
        assert_eq!(criterion.score_for(30), 0.0);
        assert_eq!(criterion.score_for(75), 50.0);
        assert!(criterion
            .evaluate(&tokenize(&words(75)))
            .feedback
            .starts_with("Adequate"));
    }

    #[test]
    fn test_plateau() {
        let criterion = LengthCriterion::new();
        assert_eq!(criterion.score_for(120), 100.0);
        assert_eq!(criterion.score_for(200), 100.0);
        assert_eq!(criterion.score_for(250), 100.0);
        assert!(criterion
            .evaluate(&tokenize(&words(150)))
            .feedback
            .starts_with("Good length"));
    }

    #[test]
    fn test_verbose_decay_and_floor() {
        let criterion = LengthCriterion::new();
        assert_eq!(criterion.score_for(375), 70.0);
        assert_eq!(criterion.score_for(500), 40.0);
        assert_eq!(criterion.score_for(5000), 40.0);
        assert!(criterion
            .evaluate(&tokenize(&words(300)))
            .feedback
            .starts_with("Verbose"));
    }

    #[test]
    fn test_empty_stream() {
        let result = LengthCriterion::new().evaluate(&TokenStream::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.feedback, super::super::NO_CONTENT_FEEDBACK);
    }

    #[test]
    fn test_custom_range() {
        let criterion = LengthCriterion::new().with_range(2, 4, 6).unwrap();
        assert_eq!(criterion.score_for(3), 50.0);
        assert_eq!(criterion.score_for(6), 100.0);
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert!(LengthCriterion::new().with_range(10, 10, 20).is_err());
        assert!(LengthCriterion::new().with_range(10, 30, 20).is_err());
        assert!(LengthCriterion::new().with_range(10, 20, 20).is_ok());
    }

    #[test]
    fn test_monotonic_up_to_max() {
        let criterion = LengthCriterion::new();
        let mut previous = 0.0;
        for count in 0..=DEFAULT_MAX_WORDS {
            let score = criterion.score_for(count);
            assert!(score >= previous, "score dropped at {} words", count);
            previous = score;
        }
    }
}
