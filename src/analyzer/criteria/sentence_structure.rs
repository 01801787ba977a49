//! Sentence structure criterion
//!
//! Average sentence length inside the ideal band scores 100; outside it the
//! score falls off as a Gaussian of the distance to the nearest band edge.

use super::{round_to, Criterion, RawResult};
use crate::analyzer::scoring::{clamp_score, gaussian_falloff};
use crate::error::ScoringError;
use crate::tokenizer::TokenStream;
use crate::Metric;

pub const DEFAULT_IDEAL_MIN: f64 = 15.0;
pub const DEFAULT_IDEAL_MAX: f64 = 20.0;
pub const DEFAULT_TOLERANCE: f64 = 8.0;

/// Scores average words per sentence
#[derive(Debug, Clone)]
pub struct SentenceStructureCriterion {
    name: String,
    ideal_min: f64,
    ideal_max: f64,
    tolerance: f64,
}

impl SentenceStructureCriterion {
    pub fn new() -> Self {
        Self {
            name: "Sentence Structure".to_string(),
            ideal_min: DEFAULT_IDEAL_MIN,
            ideal_max: DEFAULT_IDEAL_MAX,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the ideal band and falloff tolerance
    pub fn with_band(
        mut self,
        ideal_min: f64,
        ideal_max: f64,
        tolerance: f64,
    ) -> Result<Self, ScoringError> {
        let finite = ideal_min.is_finite() && ideal_max.is_finite() && tolerance.is_finite();
        if !finite || ideal_min <= 0.0 || ideal_min > ideal_max || tolerance <= 0.0 {
            return Err(ScoringError::configuration(format!(
                "criterion '{}': sentence band needs 0 < idealMin <= idealMax and tolerance > 0 (got {}/{}/{})",
                self.name, ideal_min, ideal_max, tolerance
            )));
        }
        self.ideal_min = ideal_min;
        self.ideal_max = ideal_max;
        self.tolerance = tolerance;
        Ok(self)
    }

    fn score_for(&self, average: f64) -> f64 {
        let distance = if average < self.ideal_min {
            self.ideal_min - average
        } else if average > self.ideal_max {
            average - self.ideal_max
        } else {
            0.0
        };
        clamp_score(gaussian_falloff(distance, self.tolerance))
    }
}

impl Default for SentenceStructureCriterion {
    fn default() -> Self {
        Self::new()
    }
}

impl Criterion for SentenceStructureCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_label(&self) -> &str {
        "average words per sentence"
    }

    fn evaluate(&self, tokens: &TokenStream) -> RawResult {
        let average = match tokens.average_sentence_length() {
            Some(avg) if !tokens.is_empty() => avg,
            _ => return RawResult::no_content(Metric::Decimal(0.0)),
        };

        let feedback = if average < self.ideal_min {
            format!(
                "Sentences are short and fragmented (avg {:.1} words)",
                average
            )
        } else if average > self.ideal_max {
            format!("Sentences run long (avg {:.1} words)", average)
        } else {
            format!("Well-balanced sentences (avg {:.1} words)", average)
        };

        RawResult::new(
            Metric::Decimal(round_to(average, 1)),
            self.score_for(average),
            feedback,
        )
    }
}
