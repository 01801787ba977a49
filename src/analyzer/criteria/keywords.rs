//! Keyword coverage criterion

use super::{Criterion, RawResult};
use crate::tokenizer::{normalize_phrase, TokenStream};
use crate::Metric;

/// Missing keywords named in feedback
const MAX_MISSING_LISTED: usize = 5;

#[derive(Debug, Clone)]
struct Keyword {
    display: String,
    phrase: Vec<String>,
}

/// Scores how many of the expected key points the transcript mentions
#[derive(Debug, Clone)]
pub struct KeywordCriterion {
    name: String,
    keywords: Vec<Keyword>,
}

impl KeywordCriterion {
    /// Keywords that normalize to nothing (punctuation only) are dropped
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .filter_map(|k| {
                let display = k.as_ref().trim().to_string();
                let phrase = normalize_phrase(&display);
                (!phrase.is_empty()).then_some(Keyword { display, phrase })
            })
            .collect();

        Self {
            name: "Keyword Coverage".to_string(),
            keywords,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl Criterion for KeywordCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn metric_label(&self) -> &str {
        "keywords found"
    }

    fn evaluate(&self, tokens: &TokenStream) -> RawResult {
        let total = self.keywords.len();
        if tokens.is_empty() {
            return RawResult::no_content(Metric::Text(format!("0/{}", total)));
        }
        if total == 0 {
            return RawResult::new(Metric::Text("0/0".to_string()), 100.0, "No keywords configured");
        }

        let missing: Vec<&str> = self
            .keywords
            .iter()
            .filter(|k| !tokens.contains_phrase(&k.phrase))
            .map(|k| k.display.as_str())
            .collect();
        let found = total - missing.len();

        let feedback = if missing.is_empty() {
            format!("Covered all {} key points", total)
        } else {
            let listed: Vec<&str> = missing.iter().take(MAX_MISSING_LISTED).copied().collect();
            let more = missing.len().saturating_sub(MAX_MISSING_LISTED);
            let mut text = format!(
                "Covered {} of {} key points; missing: {}",
                found,
                total,
                listed.join(", ")
            );
            if more > 0 {
                text.push_str(&format!(" (and {} more)", more));
            }
            text
        };

        RawResult::new(
            Metric::Text(format!("{}/{}", found, total)),
            found as f64 / total as f64 * 100.0,
            feedback,
        )
    }
}
