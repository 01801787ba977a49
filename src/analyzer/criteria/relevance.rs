//! Topic relevance criterion
//!
//! Similarity between the transcript and a reference description is delegated
//! to a [`SimilarityBackend`]. [`LexicalOverlap`] is the built-in backend; an
//! embedding model can be plugged in behind the same trait.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use super::{round_to, Criterion, RawResult};
use crate::analyzer::scoring::clamp_score;
use crate::error::ScoringError;
use crate::tokenizer::{tokenize, TokenStream};
use crate::Metric;

const STRONG_SIMILARITY: f64 = 0.5;
const PARTIAL_SIMILARITY: f64 = 0.25;

/// Common English words that carry no topic
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "here", "him", "his", "how", "i", "i'm", "if", "in", "into", "is",
    "it", "it's", "its", "just", "me", "more", "my", "no", "not", "of", "on", "or", "our",
    "out", "so", "some", "than", "that", "the", "their", "them", "then", "there", "these",
    "they", "this", "to", "too", "up", "us", "very", "was", "we", "were", "what", "when",
    "which", "who", "will", "with", "would", "you", "your",
];

/// Semantic similarity capability
pub trait SimilarityBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Similarity in [0, 1] between the transcript and the reference text
    fn similarity(&self, tokens: &TokenStream, reference: &str) -> f64;
}

/// Cosine similarity of term-frequency vectors, stopwords removed
#[derive(Debug, Clone)]
pub struct LexicalOverlap {
    stopwords: HashSet<String>,
}

impl LexicalOverlap {
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn term_frequencies<'a>(&self, words: &'a [String]) -> BTreeMap<&'a str, f64> {
        let mut tf = BTreeMap::new();
        for word in words.iter().filter(|w| !self.stopwords.contains(w.as_str())) {
            *tf.entry(word.as_str()).or_insert(0.0) += 1.0;
        }
        tf
    }
}

impl Default for LexicalOverlap {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityBackend for LexicalOverlap {
    fn name(&self) -> &str {
        "lexical-overlap"
    }

    fn similarity(&self, tokens: &TokenStream, reference: &str) -> f64 {
        let reference_tokens = tokenize(reference);
        let a = self.term_frequencies(tokens.normalized_words());
        let b = self.term_frequencies(reference_tokens.normalized_words());
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let dot: f64 = a
            .iter()
            .filter_map(|(term, x)| b.get::<str>(term).map(|y| x * y))
            .sum();
        let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
        let norm_b = b.values().map(|y| y * y).sum::<f64>().sqrt();

        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

/// Scores how close the transcript stays to a reference topic description
#[derive(Clone)]
pub struct RelevanceCriterion {
    name: String,
    reference: String,
    backend: Arc<dyn SimilarityBackend>,
}

impl RelevanceCriterion {
    /// Relevance against `reference` using [`LexicalOverlap`]
    pub fn new(reference: impl Into<String>) -> Result<Self, ScoringError> {
        let reference = reference.into();
        if tokenize(&reference).is_empty() {
            return Err(ScoringError::configuration(
                "relevance criterion needs a non-empty reference text",
            ));
        }
        Ok(Self {
            name: "Topic Relevance".to_string(),
            reference,
            backend: Arc::new(LexicalOverlap::new()),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn SimilarityBackend>) -> Self {
        self.backend = backend;
        self
    }
}

impl fmt::Debug for RelevanceCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelevanceCriterion")
            .field("name", &self.name)
            .field("reference", &self.reference)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Criterion for RelevanceCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_label(&self) -> &str {
        "similarity"
    }

    fn evaluate(&self, tokens: &TokenStream) -> RawResult {
        if tokens.is_empty() {
            return RawResult::no_content(Metric::Decimal(0.0));
        }

        // clamp keeps NaN, which the engine rejects as a broken backend
        let similarity = self
            .backend
            .similarity(tokens, &self.reference)
            .clamp(0.0, 1.0);

        let feedback = if similarity >= STRONG_SIMILARITY {
            format!("Strongly on topic (similarity {:.2})", similarity)
        } else if similarity >= PARTIAL_SIMILARITY {
            format!("Partially on topic (similarity {:.2})", similarity)
        } else {
            format!("Mostly off topic (similarity {:.2})", similarity)
        };

        RawResult::new(
            Metric::Decimal(round_to(similarity, 2)),
            clamp_score(similarity * 100.0),
            feedback,
        )
    }
}
