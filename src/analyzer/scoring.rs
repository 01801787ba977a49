//! Score normalization curves and overall score calculation

use crate::{EvaluationReport, Grade};

/// Criteria scoring below this get a recommendation
const RECOMMENDATION_THRESHOLD: u8 = 60;

/// Calculator for transcript scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Weighted average of integer criterion scores, rounded.
    ///
    /// Weights need not sum to 1. No criteria (or zero total weight) yields 0.
    pub fn overall<I>(scored: I) -> u8
    where
        I: IntoIterator<Item = (u8, f64)>,
    {
        let (weighted_sum, total_weight) = scored
            .into_iter()
            .fold((0.0, 0.0), |(sum, total), (score, weight)| {
                (sum + f64::from(score) * weight, total + weight)
            });

        if total_weight <= 0.0 {
            return 0;
        }

        (weighted_sum / total_weight).round().clamp(0.0, 100.0) as u8
    }

    /// Get grade description
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::A => "Excellent - Clear, well-paced and on point",
            Grade::B => "Good - Solid delivery with minor weaknesses",
            Grade::C => "Fair - Understandable but needs polish",
            Grade::D => "Poor - Several criteria need work",
            Grade::F => "Failing - Needs major improvement",
        }
    }

    /// Feedback of the weakest criteria, lowest score first
    pub fn recommendations(report: &EvaluationReport) -> Vec<String> {
        let mut weak: Vec<_> = report
            .criteria
            .iter()
            .filter(|c| c.score < RECOMMENDATION_THRESHOLD)
            .collect();
        // Stable sort keeps registry order among ties
        weak.sort_by_key(|c| c.score);

        let recs: Vec<String> = weak
            .into_iter()
            .map(|c| format!("{}: {}", c.criterion_name, c.feedback))
            .collect();

        if recs.is_empty() {
            vec!["Strong transcript across all criteria".to_string()]
        } else {
            recs
        }
    }
}

/// Linear ramp: 0 at `from`, 100 at `to`, clamped outside
pub fn linear_ramp(value: f64, from: f64, to: f64) -> f64 {
    if to <= from {
        return if value >= to { 100.0 } else { 0.0 };
    }
    clamp_score((value - from) / (to - from) * 100.0)
}

/// Gaussian falloff from 100 at distance 0
pub fn gaussian_falloff(distance: f64, tolerance: f64) -> f64 {
    if tolerance <= 0.0 {
        return if distance == 0.0 { 100.0 } else { 0.0 };
    }
    100.0 * (-(distance * distance) / (2.0 * tolerance * tolerance)).exp()
}

/// Clamp into [0, 100]
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
