//! Scoring engine - orchestrates transcript evaluation

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::criteria::RawResult;
use super::scoring::ScoreCalculator;
use crate::cache::{CacheStats, ReportCache};
use crate::error::ScoringError;
use crate::registry::{CriterionRegistry, RegisteredCriterion};
use crate::tokenizer::{tokenize, TokenStream};
use crate::{CriterionResult, EvaluationReport};

const LOG_TARGET: &str = "engine";

/// Message for a transcript that is empty after trimming
pub const EMPTY_TRANSCRIPT: &str = "No transcript provided";

/// Main scoring engine
///
/// Holds a read-only registry and is safe to share across threads.
#[derive(Debug)]
pub struct ScoringEngine {
    registry: Arc<CriterionRegistry>,
    /// Run criteria on the rayon pool
    parallel: bool,
    cache: Option<ReportCache>,
}

impl ScoringEngine {
    pub fn new(registry: CriterionRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    /// Engine over a registry shared with other engines
    pub fn from_shared(registry: Arc<CriterionRegistry>) -> Self {
        Self {
            registry,
            parallel: false,
            cache: None,
        }
    }

    /// Engine over the standard rubric
    pub fn standard() -> Self {
        Self::new(CriterionRegistry::standard())
    }

    /// Evaluate criteria in parallel. Results stay in registry order.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Cache up to `capacity` reports by transcript fingerprint (0 disables)
    pub fn with_cache(mut self, capacity: usize) -> Self {
        self.cache = (capacity > 0).then(|| ReportCache::new(capacity));
        self
    }

    pub fn registry(&self) -> &CriterionRegistry {
        &self.registry
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(ReportCache::stats)
    }

    /// Evaluate one transcript.
    ///
    /// Fails only with [`ScoringError::InvalidInput`] when the trimmed text is
    /// empty. Panics if a criterion yields a score outside [0, 100].
    pub fn evaluate(&self, text: &str) -> Result<EvaluationReport, ScoringError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ScoringError::invalid_input(EMPTY_TRANSCRIPT));
        }

        if let Some(report) = self.cache.as_ref().and_then(|c| c.get(text)) {
            return Ok(report);
        }

        let report = self.evaluate_trimmed(text);

        if let Some(cache) = &self.cache {
            cache.insert(text, report.clone());
        }
        Ok(report)
    }

    fn evaluate_trimmed(&self, text: &str) -> EvaluationReport {
        let tokens = tokenize(text);
        let entries = self.registry.list();

        let criteria: Vec<CriterionResult> = if self.parallel {
            entries
                .par_iter()
                .map(|entry| run_criterion(entry, &tokens))
                .collect()
        } else {
            entries
                .iter()
                .map(|entry| run_criterion(entry, &tokens))
                .collect()
        };

        let overall_score = ScoreCalculator::overall(
            criteria
                .iter()
                .zip(entries)
                .map(|(result, entry)| (result.score, entry.weight())),
        );

        log::debug!(
            target: LOG_TARGET,
            "evaluated {} words in {} sentences: overall {}",
            tokens.word_count(),
            tokens.sentence_count(),
            overall_score
        );

        EvaluationReport {
            overall_score,
            word_count: tokens.word_count(),
            criteria,
        }
    }

    /// Evaluate a batch in parallel, preserving input order
    pub fn evaluate_many(&self, texts: &[String]) -> Vec<Result<EvaluationReport, ScoringError>> {
        texts.par_iter().map(|t| self.evaluate(t)).collect()
    }

    /// Get aggregate stats from multiple reports
    pub fn aggregate_stats(reports: &[EvaluationReport]) -> AggregateStats {
        if reports.is_empty() {
            return AggregateStats::default();
        }

        let total_score: u32 = reports.iter().map(|r| u32::from(r.overall_score)).sum();
        let average_score = (f64::from(total_score) / reports.len() as f64).round() as u8;

        AggregateStats {
            transcripts_scored: reports.len(),
            average_score,
            total_words: reports.iter().map(|r| r.word_count).sum(),
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn run_criterion(entry: &RegisteredCriterion, tokens: &TokenStream) -> CriterionResult {
    let criterion = entry.criterion();
    let RawResult {
        metric,
        score,
        feedback,
    } = criterion.evaluate(tokens);

    // Criteria are total functions; anything else is a bug in the criterion
    assert!(
        score.is_finite() && (0.0..=100.0).contains(&score),
        "criterion '{}' produced invalid score {}",
        criterion.name(),
        score
    );

    log::trace!(
        target: LOG_TARGET,
        "{}: {} = {} -> {:.1}",
        criterion.name(),
        criterion.metric_label(),
        metric,
        score
    );

    CriterionResult {
        criterion_name: criterion.name().to_string(),
        metric,
        score: score.round() as u8,
        feedback,
    }
}

/// Aggregate statistics from multiple transcripts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub transcripts_scored: usize,
    /// Rounded mean of the overall scores
    pub average_score: u8,
    pub total_words: usize,
}
