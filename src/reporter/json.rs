//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::{EvaluationReport, Grade, ScoredTranscript};
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single evaluation exactly in the wire format
    pub fn report(&self, report: &EvaluationReport) -> String {
        self.render(report, "{}")
    }

    /// Report several transcripts with a summary
    pub fn report_with_summary(
        &self,
        results: &[ScoredTranscript],
        stats: &AggregateStats,
    ) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                transcripts_scored: stats.transcripts_scored,
                average_score: stats.average_score,
                average_grade: Grade::from_score(stats.average_score).to_string(),
                total_words: stats.total_words,
            },
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    results: &'a [ScoredTranscript],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    transcripts_scored: usize,
    average_score: u8,
    average_grade: String,
    total_words: usize,
}
