//! Transcript Scorer: multi-criterion evaluation of spoken transcripts
//!
//! This library tokenizes free-form transcript text, runs a registry of
//! independent scoring criteria over it and aggregates their normalized
//! scores into a weighted overall score.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod server;
pub mod tokenizer;

pub use analyzer::criteria::Criterion;
pub use analyzer::engine::ScoringEngine;
pub use error::ScoringError;
pub use registry::CriterionRegistry;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of evaluating one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Weighted overall score (0-100)
    pub overall_score: u8,
    /// Number of words in the transcript
    pub word_count: usize,
    /// Per-criterion results, in registry order
    pub criteria: Vec<CriterionResult>,
}

impl EvaluationReport {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.overall_score)
    }

    /// Result for a criterion by name
    pub fn criterion(&self, name: &str) -> Option<&CriterionResult> {
        self.criteria.iter().find(|c| c.criterion_name == name)
    }
}

/// Outcome of a single criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion_name: String,
    /// Raw metric value (number or display string)
    pub metric: Metric,
    /// Normalized score (0-100)
    pub score: u8,
    pub feedback: String,
}

/// A raw metric value: serialized as a plain JSON number or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    Integer(u64),
    Decimal(f64),
    Text(String),
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Integer(n) => write!(f, "{}", n),
            Metric::Decimal(x) => write!(f, "{}", x),
            Metric::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A report tied to the file it came from (CLI runs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTranscript {
    pub path: PathBuf,
    pub report: EvaluationReport,
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Public API: score a single transcript with the rubric found from `work_dir`.
///
/// * `text` - the transcript
/// * `work_dir` - directory to start the `.scorerc.json` search from
/// * `config_path` - optional explicit rubric config; if None, searches from work_dir
pub fn evaluate_transcript(
    text: &str,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<EvaluationReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let registry = CriterionRegistry::from_config(&config)?;
    let engine = ScoringEngine::new(registry);
    Ok(engine.evaluate(text)?)
}
