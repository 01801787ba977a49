//! Filler / hedging density criterion

use super::{round_to, Criterion, RawResult};
use crate::error::ScoringError;
use crate::tokenizer::{normalize_phrase, TokenStream};
use crate::Metric;

pub const DEFAULT_PENALTY_FACTOR: f64 = 5.0;

/// Filler words and hedges matched by default
pub const DEFAULT_FILLERS: &[&str] = &[
    "um",
    "uh",
    "er",
    "erm",
    "ah",
    "hmm",
    "like",
    "basically",
    "actually",
    "literally",
    "you know",
    "i mean",
    "sort of",
    "kind of",
];

/// Scores how sparingly the speaker uses filler words
#[derive(Debug, Clone)]
pub struct FillerCriterion {
    name: String,
    /// Normalized phrases, longest first
    phrases: Vec<Vec<String>>,
    penalty_factor: f64,
}

impl FillerCriterion {
    pub fn new() -> Self {
        Self {
            name: "Filler Words".to_string(),
            phrases: prepare_phrases(DEFAULT_FILLERS.iter().copied()),
            penalty_factor: DEFAULT_PENALTY_FACTOR,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the filler set. Entries may be multi-word phrases.
    pub fn with_fillers<I, S>(mut self, fillers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.phrases = prepare_phrases(fillers);
        self
    }

    pub fn with_penalty_factor(mut self, factor: f64) -> Result<Self, ScoringError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ScoringError::configuration(format!(
                "criterion '{}': penalty factor must be a positive number (got {})",
                self.name, factor
            )));
        }
        self.penalty_factor = factor;
        Ok(self)
    }

    /// Count filler matches, non-overlapping, trying longer phrases first
    pub fn count_fillers(&self, tokens: &TokenStream) -> usize {
        let words = tokens.normalized_words();
        let mut count = 0;
        let mut i = 0;
        while i < words.len() {
            match self.phrases.iter().find(|p| words[i..].starts_with(p)) {
                Some(phrase) => {
                    count += 1;
                    i += phrase.len();
                }
                None => i += 1,
            }
        }
        count
    }
}

impl Default for FillerCriterion {
    fn default() -> Self {
        Self::new()
    }
}

fn prepare_phrases<I, S>(fillers: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut phrases: Vec<Vec<String>> = Vec::new();
    for filler in fillers {
        let phrase = normalize_phrase(filler.as_ref());
        if !phrase.is_empty() && !phrases.contains(&phrase) {
            phrases.push(phrase);
        }
    }
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));
    phrases
}

impl Criterion for FillerCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_label(&self) -> &str {
        "filler ratio"
    }

    fn evaluate(&self, tokens: &TokenStream) -> RawResult {
        let total = tokens.word_count();
        if total == 0 {
            return RawResult::no_content(Metric::Decimal(0.0));
        }

        let count = self.count_fillers(tokens);
        let ratio = count as f64 / total as f64;
        let score = (100.0 - ratio * 100.0 * self.penalty_factor).max(0.0);

        let feedback = if count == 0 {
            "No filler words detected".to_string()
        } else if score >= 80.0 {
            format!("Minimal filler words: {} found", count)
        } else if score >= 50.0 {
            format!(
                "Noticeable filler words: {} found ({:.1}% of words)",
                count,
                ratio * 100.0
            )
        } else {
            format!(
                "Heavy use of filler words: {} found ({:.1}% of words)",
                count,
                ratio * 100.0
            )
        };

        RawResult::new(Metric::Decimal(round_to(ratio, 3)), score, feedback)
    }
}
