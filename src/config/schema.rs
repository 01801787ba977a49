//! Config schema and deserialization

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyzer::criteria::filler::{DEFAULT_FILLERS, DEFAULT_PENALTY_FACTOR};
use crate::analyzer::criteria::length::{DEFAULT_IDEAL_WORDS, DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS};
use crate::analyzer::criteria::sentence_structure::{
    DEFAULT_IDEAL_MAX, DEFAULT_IDEAL_MIN, DEFAULT_TOLERANCE,
};

/// Default number of cached reports for `serve`
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// Criterion kind and its parameters. Omitted parameters take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CriterionKind {
    #[serde(rename_all = "camelCase")]
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_words: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ideal_words: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_words: Option<usize>,
    },
    Vocabulary,
    #[serde(rename_all = "camelCase")]
    SentenceStructure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ideal_min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ideal_max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Filler {
        /// Replaces the default filler set when present
        #[serde(default, skip_serializing_if = "Option::is_none")]
        words: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        penalty_factor: Option<f64>,
    },
    Keywords {
        #[serde(default)]
        keywords: Vec<String>,
    },
    Relevance {
        /// Topic description the transcript is compared against
        reference: String,
    },
}

/// One criterion entry in the rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionEntry {
    /// Display name; defaults to the kind's built-in name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Relative weight (default 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub enabled: bool,

    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl CriterionEntry {
    pub fn new(kind: CriterionKind) -> Self {
        Self {
            name: None,
            weight: None,
            enabled: true,
            kind,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Root config structure for .scorerc.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum overall score (exit 1 if below)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Criteria in evaluation order. Empty means the standard rubric.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<CriterionEntry>,

    /// Weight overrides by criterion name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub weights: BTreeMap<String, f64>,

    /// Criterion names to leave out
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,

    /// Glob patterns for files/directories to skip in directory runs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// File suffixes treated as transcripts (default: .txt, .md, .transcript)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript_patterns: Vec<String>,

    /// Report cache size for `serve` (0 disables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<usize>,
}

impl Config {
    /// Starter config written by `init`: the standard rubric spelled out
    pub fn starter(threshold: u8) -> Self {
        Self {
            threshold: Some(threshold),
            criteria: vec![
                CriterionEntry::new(CriterionKind::Length {
                    min_words: Some(DEFAULT_MIN_WORDS),
                    ideal_words: Some(DEFAULT_IDEAL_WORDS),
                    max_words: Some(DEFAULT_MAX_WORDS),
                })
                .with_weight(1.5),
                CriterionEntry::new(CriterionKind::Vocabulary).with_weight(1.0),
                CriterionEntry::new(CriterionKind::SentenceStructure {
                    ideal_min: Some(DEFAULT_IDEAL_MIN),
                    ideal_max: Some(DEFAULT_IDEAL_MAX),
                    tolerance: Some(DEFAULT_TOLERANCE),
                })
                .with_weight(1.0),
                CriterionEntry::new(CriterionKind::Filler {
                    words: Some(DEFAULT_FILLERS.iter().map(|w| w.to_string()).collect()),
                    penalty_factor: Some(DEFAULT_PENALTY_FACTOR),
                })
                .with_weight(1.5),
            ],
            ..Self::default()
        }
    }

    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        // A criteria list replaces the base list as a whole
        if self.criteria.is_empty() {
            self.criteria = base.criteria;
        }

        for (name, weight) in base.weights {
            self.weights.entry(name).or_insert(weight);
        }

        let mut all_disabled = base.disabled;
        for name in self.disabled.drain(..) {
            if !all_disabled.contains(&name) {
                all_disabled.push(name);
            }
        }
        self.disabled = all_disabled;

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.transcript_patterns.is_empty() {
            self.transcript_patterns = base.transcript_patterns;
        }
        if self.cache_capacity.is_none() {
            self.cache_capacity = base.cache_capacity;
        }
    }

    /// Get transcript file patterns
    pub fn get_transcript_patterns(&self) -> Vec<&str> {
        if self.transcript_patterns.is_empty() {
            vec![".txt", ".md", ".transcript"]
        } else {
            self.transcript_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY)
    }
}
