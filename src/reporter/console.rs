//! Console reporter with colored output

use std::collections::HashMap;

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::registry::CriterionRegistry;
use crate::{CriterionResult, EvaluationReport, Grade, ScoredTranscript};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Metric label and weight by criterion name
    details: HashMap<String, (String, f64)>,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            details: HashMap::new(),
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Show metric labels and weights from the registry in verbose mode
    pub fn with_registry(mut self, registry: &CriterionRegistry) -> Self {
        self.details = registry
            .list()
            .iter()
            .map(|e| {
                (
                    e.name().to_string(),
                    (e.criterion().metric_label().to_string(), e.weight()),
                )
            })
            .collect();
        self
    }

    /// Report a single transcript
    pub fn report(&self, scored: &ScoredTranscript) {
        self.print_header(scored);
        self.print_score(&scored.report);
        self.print_criteria(&scored.report.criteria);
        self.print_recommendations(&scored.report);
        println!();
    }

    /// Report multiple transcripts with summary
    pub fn report_many(&self, results: &[ScoredTranscript], stats: &AggregateStats) {
        for scored in results {
            self.report(scored);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, scored: &ScoredTranscript) {
        let grade_colored = self.colorize_grade(&scored.report.grade());
        println!(
            "{}: {} ({})",
            scored.path.display(),
            scored.report.overall_score,
            grade_colored
        );
    }

    fn print_header(&self, scored: &ScoredTranscript) {
        println!();
        println!(
            "{}",
            format!("📊 Transcript Evaluation: {}", scored.path.display()).bold()
        );
        println!(
            "   Words: {} | Criteria: {}",
            scored.report.word_count,
            scored.report.criteria.len()
        );
        println!();
    }

    fn print_score(&self, report: &EvaluationReport) {
        let grade = report.grade();
        let score_bar = self.create_score_bar(report.overall_score);

        println!("   Score: {} {}", score_bar, self.colorize_grade(&grade).bold());
        println!("   {}", self.dim(ScoreCalculator::grade_description(grade)));
        println!();
    }

    fn print_criteria(&self, criteria: &[CriterionResult]) {
        println!("   {}", "Criteria:".bold());

        let name_width = criteria
            .iter()
            .map(|c| c.criterion_name.chars().count())
            .max()
            .unwrap_or(0);

        for result in criteria {
            let bar = self.create_mini_bar(result.score);
            let score_str = format!("{:>3}", result.score);
            let colored_score = if !self.use_colors {
                score_str.normal()
            } else if result.score >= 80 {
                score_str.green()
            } else if result.score >= 60 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            let metric = result.metric.to_string();
            let (metric, feedback) = if self.use_colors {
                (metric.dimmed(), result.feedback.italic())
            } else {
                (metric.normal(), result.feedback.normal())
            };
            println!(
                "   {} {} {:<width$}  {}",
                bar,
                colored_score,
                result.criterion_name,
                metric,
                width = name_width
            );
            println!("       {} {}", self.dim("→"), feedback);

            if self.verbose {
                if let Some((label, weight)) = self.details.get(&result.criterion_name) {
                    println!(
                        "       {}",
                        self.dim(&format!("metric: {} | weight: {}", label, weight))
                    );
                }
            }
        }
        println!();
    }

    fn print_recommendations(&self, report: &EvaluationReport) {
        if report.overall_score >= 90 {
            return;
        }
        let recs = ScoreCalculator::recommendations(report);
        println!("   {}", "Recommendations:".bold());
        for rec in recs.iter().take(3) {
            println!("   {} {}", "→".cyan(), rec);
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Transcripts scored: {}",
            stats.transcripts_scored.to_string().bold()
        );
        println!(
            "   Average score:      {} ({})",
            stats.average_score.to_string().bold(),
            self.colorize_grade(&Grade::from_score(stats.average_score))
        );
        println!("   Total words:        {}", stats.total_words);
        println!();
    }

    fn dim(&self, text: &str) -> colored::ColoredString {
        if self.use_colors {
            text.dimmed()
        } else {
            text.normal()
        }
    }

    fn colorize_grade(&self, grade: &Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;
        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = (score as usize * 10) / 100;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
