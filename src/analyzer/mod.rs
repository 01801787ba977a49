//! Analyzer module - transcript scoring engine

pub mod criteria;
pub mod engine;
pub mod scoring;

pub use engine::{AggregateStats, ScoringEngine};
pub use scoring::ScoreCalculator;
