//! Criterion registry: the ordered, weighted set of active criteria
//!
//! Built once at startup (from [`CriterionRegistry::standard`] or a rubric
//! config) and then only read. The engine shares it behind an `Arc`.

use std::collections::HashSet;
use std::fmt;

use crate::analyzer::criteria::{
    Criterion, FillerCriterion, KeywordCriterion, LengthCriterion, RelevanceCriterion,
    SentenceStructureCriterion, VocabularyCriterion,
};
use crate::analyzer::criteria::length::{DEFAULT_IDEAL_WORDS, DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS};
use crate::analyzer::criteria::sentence_structure::{
    DEFAULT_IDEAL_MAX, DEFAULT_IDEAL_MIN, DEFAULT_TOLERANCE,
};
use crate::config::{Config, CriterionEntry, CriterionKind};
use crate::error::ScoringError;

const DEFAULT_WEIGHT: f64 = 1.0;

/// A criterion together with its weight
pub struct RegisteredCriterion {
    criterion: Box<dyn Criterion>,
    weight: f64,
}

impl RegisteredCriterion {
    pub fn criterion(&self) -> &dyn Criterion {
        self.criterion.as_ref()
    }

    pub fn name(&self) -> &str {
        self.criterion.name()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Ordered collection of criteria, unique by name
#[derive(Default)]
pub struct CriterionRegistry {
    entries: Vec<RegisteredCriterion>,
}

impl CriterionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard rubric: Length, Vocabulary Diversity, Sentence Structure, Filler Words
    pub fn standard() -> Self {
        let entry = |criterion: Box<dyn Criterion>, weight: f64| RegisteredCriterion {
            criterion,
            weight,
        };
        Self {
            entries: vec![
                entry(Box::new(LengthCriterion::new()), 1.5),
                entry(Box::new(VocabularyCriterion::new()), 1.0),
                entry(Box::new(SentenceStructureCriterion::new()), 1.0),
                entry(Box::new(FillerCriterion::new()), 1.5),
            ],
        }
    }

    /// Append a criterion. Fails on a duplicate name or a weight that is not a positive number.
    pub fn register(
        &mut self,
        criterion: Box<dyn Criterion>,
        weight: f64,
    ) -> Result<(), ScoringError> {
        let name = criterion.name();
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ScoringError::configuration(format!(
                "criterion '{}' has invalid weight {}: weights must be positive numbers",
                name, weight
            )));
        }
        if self.weight_of(name).is_some() {
            return Err(ScoringError::configuration(format!(
                "duplicate criterion name '{}'",
                name
            )));
        }
        self.entries.push(RegisteredCriterion { criterion, weight });
        Ok(())
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(
        mut self,
        criterion: impl Criterion + 'static,
        weight: f64,
    ) -> Result<Self, ScoringError> {
        self.register(Box::new(criterion), weight)?;
        Ok(self)
    }

    /// Build the registry described by a rubric config.
    ///
    /// An empty `criteria` list means the standard rubric. `weights` then
    /// reweights and `disabled` removes criteria by name; both must name
    /// criteria that exist. At least one criterion must remain.
    pub fn from_config(config: &Config) -> Result<Self, ScoringError> {
        let entries = if config.criteria.is_empty() {
            standard_entries()
        } else {
            config.criteria.clone()
        };

        let mut candidates = Vec::with_capacity(entries.len());
        for entry in &entries {
            let criterion = build_criterion(entry)?;
            let weight = entry.weight.unwrap_or_else(|| default_weight(&entry.kind));
            candidates.push((criterion, weight, entry.enabled));
        }

        let known: HashSet<String> = candidates
            .iter()
            .map(|(c, _, _)| c.name().to_string())
            .collect();
        for name in config.weights.keys().chain(config.disabled.iter()) {
            if !known.contains(name) {
                return Err(ScoringError::configuration(format!(
                    "unknown criterion '{}' in weights/disabled",
                    name
                )));
            }
        }

        let mut registry = Self::new();
        for (criterion, weight, enabled) in candidates {
            let name = criterion.name().to_string();
            if !enabled || config.disabled.contains(&name) {
                continue;
            }
            let weight = config.weights.get(&name).copied().unwrap_or(weight);
            registry.register(criterion, weight)?;
        }

        if registry.is_empty() {
            return Err(ScoringError::configuration(
                "rubric has no enabled criteria",
            ));
        }
        Ok(registry)
    }

    /// Criteria in registration order
    pub fn list(&self) -> &[RegisteredCriterion] {
        &self.entries
    }

    pub fn weight_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name() == name)
            .map(|e| e.weight)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for CriterionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.name(), e.weight)))
            .finish()
    }
}

/// The standard rubric as config entries
fn standard_entries() -> Vec<CriterionEntry> {
    vec![
        CriterionEntry::new(CriterionKind::Length {
            min_words: None,
            ideal_words: None,
            max_words: None,
        }),
        CriterionEntry::new(CriterionKind::Vocabulary),
        CriterionEntry::new(CriterionKind::SentenceStructure {
            ideal_min: None,
            ideal_max: None,
            tolerance: None,
        }),
        CriterionEntry::new(CriterionKind::Filler {
            words: None,
            penalty_factor: None,
        }),
    ]
}

fn default_weight(kind: &CriterionKind) -> f64 {
    match kind {
        CriterionKind::Length { .. } | CriterionKind::Filler { .. } => 1.5,
        _ => DEFAULT_WEIGHT,
    }
}

fn build_criterion(entry: &CriterionEntry) -> Result<Box<dyn Criterion>, ScoringError> {
    let criterion: Box<dyn Criterion> = match &entry.kind {
        CriterionKind::Length {
            min_words,
            ideal_words,
            max_words,
        } => {
            let mut c = LengthCriterion::new();
            if let Some(name) = &entry.name {
                c = c.with_name(name);
            }
            Box::new(c.with_range(
                min_words.unwrap_or(DEFAULT_MIN_WORDS),
                ideal_words.unwrap_or(DEFAULT_IDEAL_WORDS),
                max_words.unwrap_or(DEFAULT_MAX_WORDS),
            )?)
        }
        CriterionKind::Vocabulary => {
            let mut c = VocabularyCriterion::new();
            if let Some(name) = &entry.name {
                c = c.with_name(name);
            }
            Box::new(c)
        }
        CriterionKind::SentenceStructure {
            ideal_min,
            ideal_max,
            tolerance,
        } => {
            let mut c = SentenceStructureCriterion::new();
            if let Some(name) = &entry.name {
                c = c.with_name(name);
            }
            Box::new(c.with_band(
                ideal_min.unwrap_or(DEFAULT_IDEAL_MIN),
                ideal_max.unwrap_or(DEFAULT_IDEAL_MAX),
                tolerance.unwrap_or(DEFAULT_TOLERANCE),
            )?)
        }
        CriterionKind::Filler {
            words,
            penalty_factor,
        } => {
            let mut c = FillerCriterion::new();
            if let Some(name) = &entry.name {
                c = c.with_name(name);
            }
            if let Some(words) = words {
                c = c.with_fillers(words);
            }
            if let Some(factor) = penalty_factor {
                c = c.with_penalty_factor(*factor)?;
            }
            Box::new(c)
        }
        CriterionKind::Keywords { keywords } => {
            let mut c = KeywordCriterion::new(keywords);
            if let Some(name) = &entry.name {
                c = c.with_name(name);
            }
            Box::new(c)
        }
        CriterionKind::Relevance { reference } => {
            let mut c = RelevanceCriterion::new(reference.as_str())?;
            if let Some(name) = &entry.name {
                c = c.with_name(name);
            }
            Box::new(c)
        }
    };
    Ok(criterion)
}
