//! Transcript tokenizer: words and sentences
//!
//! Every criterion works off the [`TokenStream`] produced here. Tokenization is
//! locale-naive: a word is a run of Unicode letters/digits, optionally joined by
//! an apostrophe or hyphen (`don't`, `well-known`). A sentence ends at `.`, `!`
//! or `?` (or a run of them) followed by whitespace or the end of the text.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("word pattern is valid")
    })
}

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("boundary pattern is valid"))
}

/// A sentence from the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Sentence text, trimmed, including its terminal punctuation
    pub text: String,
    /// Number of words in the sentence (always >= 1)
    pub word_count: usize,
}

/// Read-only tokenized view of one transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    words: Vec<String>,
    normalized: Vec<String>,
    sentences: Vec<Sentence>,
}

impl TokenStream {
    /// Words in transcript order, as written
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Lowercase words with typographic apostrophes folded to `'`
    pub fn normalized_words(&self) -> &[String] {
        &self.normalized
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct normalized words
    pub fn unique_word_count(&self) -> usize {
        self.normalized
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Average words per sentence, or None when there are no sentences
    pub fn average_sentence_length(&self) -> Option<f64> {
        if self.sentences.is_empty() {
            return None;
        }
        Some(self.word_count() as f64 / self.sentences.len() as f64)
    }

    /// Count non-overlapping occurrences of a normalized word sequence
    pub fn count_phrase(&self, phrase: &[String]) -> usize {
        if phrase.is_empty() || phrase.len() > self.normalized.len() {
            return 0;
        }
        let mut count = 0;
        let mut i = 0;
        while i + phrase.len() <= self.normalized.len() {
            if self.normalized[i..i + phrase.len()] == *phrase {
                count += 1;
                i += phrase.len();
            } else {
                i += 1;
            }
        }
        count
    }

    /// True if the normalized word sequence occurs anywhere in the transcript
    pub fn contains_phrase(&self, phrase: &[String]) -> bool {
        !phrase.is_empty()
            && self
                .normalized
                .windows(phrase.len())
                .any(|window| window == phrase)
    }
}

fn normalize_word(word: &str) -> String {
    word.to_lowercase().replace('’', "'")
}

fn split_words(text: &str) -> Vec<String> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Split a phrase (e.g. a filler or keyword entry from config) into normalized words
pub fn normalize_phrase(phrase: &str) -> Vec<String> {
    split_words(phrase)
        .iter()
        .map(|w| normalize_word(w))
        .collect()
}

/// Tokenize a transcript. Pure and deterministic; never fails.
pub fn tokenize(text: &str) -> TokenStream {
    let mut words = Vec::new();
    let mut sentences = Vec::new();

    let mut push_fragment = |fragment: &str| {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        let fragment_words = split_words(fragment);
        // A run of bare punctuation ("...") is not a sentence
        if fragment_words.is_empty() {
            return;
        }
        sentences.push(Sentence {
            text: fragment.to_string(),
            word_count: fragment_words.len(),
        });
        words.extend(fragment_words);
    };

    let mut start = 0;
    for boundary in sentence_boundary().find_iter(text) {
        push_fragment(&text[start..boundary.end()]);
        start = boundary.end();
    }
    push_fragment(&text[start..]);

    let normalized = words.iter().map(|w| normalize_word(w)).collect();

    TokenStream {
        words,
        normalized,
        sentences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_word_count() {
        let tokens = tokenize("The quick brown fox");
        assert_eq!(tokens.word_count(), 4);
        assert_eq!(tokens.words(), &["The", "quick", "brown", "fox"]);
        assert_eq!(tokens.sentence_count(), 1);
    }

    #[test]
    fn test_empty_and_whitespace() {
        for text in ["", "   ", "\n\t  \n"] {
            let tokens = tokenize(text);
            assert_eq!(tokens.word_count(), 0, "text {:?}", text);
            assert_eq!(tokens.sentence_count(), 0, "text {:?}", text);
            assert!(tokens.is_empty());
            assert_eq!(tokens.average_sentence_length(), None);
        }
    }

    #[test]
    fn test_contractions_and_hyphens_are_single_words() {
        let tokens = tokenize("I don't think it's a well-known state-of-the-art idea");
        assert_eq!(
            tokens.words(),
            &["I", "don't", "think", "it's", "a", "well-known", "state-of-the-art", "idea"]
        );
    }

    #[test]
    fn test_dangling_punctuation_splits_words() {
        // Apostrophes and hyphens only join when letters sit on both sides
        let tokens = tokenize("'quoted' -- dash - separated");
        assert_eq!(tokens.words(), &["quoted", "dash", "separated"]);
    }

    #[test]
    fn test_sentence_splitting() {
        let tokens = tokenize("Hello there. How are you? I am fine! Thanks");
        let texts: Vec<&str> = tokens.sentences().iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Hello there.", "How are you?", "I am fine!", "Thanks"]
        );
        let counts: Vec<usize> = tokens.sentences().iter().map(|s| s.word_count).collect();
        assert_eq!(counts, vec![2, 3, 3, 1]);
    }

    #[test]
    fn test_decimal_point_does_not_split_sentence() {
        let tokens = tokenize("Pi is about 3.14 and that is fine.");
        assert_eq!(tokens.sentence_count(), 1);
        // Digits around the dot are separate words
        assert_eq!(tokens.word_count(), 9);
    }

    #[test]
    fn test_punctuation_runs() {
        let tokens = tokenize("Really?! Yes... absolutely.");
        assert_eq!(tokens.sentence_count(), 3);
    }

    #[test]
    fn test_punctuation_only_fragment_is_not_a_sentence() {
        let tokens = tokenize("Hello. ... World.");
        assert_eq!(tokens.sentence_count(), 2);
        assert_eq!(tokens.word_count(), 2);
    }

    #[test]
    fn test_sentence_word_counts_sum_to_total() {
        let tokens = tokenize("One two. Three, four; five! Six-seven eight? nine");
        let sum: usize = tokens.sentences().iter().map(|s| s.word_count).sum();
        assert_eq!(sum, tokens.word_count());
    }

    #[test]
    fn test_unicode_words() {
        let tokens = tokenize("Café crème était très bon. Über 123");
        assert_eq!(tokens.word_count(), 7);
        assert_eq!(tokens.normalized_words()[0], "café");
    }

    #[test]
    fn test_normalization_folds_case_and_apostrophes() {
        let tokens = tokenize("Don’t DON'T don't");
        assert_eq!(tokens.unique_word_count(), 1);
    }

    #[test]
    fn test_average_sentence_length() {
        let tokens = tokenize("One two three. Four five six seven eight.");
        assert_eq!(tokens.average_sentence_length(), Some(4.0));
    }

    #[test]
    fn test_count_phrase_non_overlapping() {
        let tokens = tokenize("you know you know you know what");
        let phrase = normalize_phrase("you know");
        assert_eq!(tokens.count_phrase(&phrase), 3);

        let tokens = tokenize("ha ha ha");
        assert_eq!(tokens.count_phrase(&normalize_phrase("ha ha")), 1);
    }

    #[test]
    fn test_count_phrase_edge_cases() {
        let tokens = tokenize("short");
        assert_eq!(tokens.count_phrase(&[]), 0);
        assert_eq!(tokens.count_phrase(&normalize_phrase("too long phrase")), 0);
    }

    #[test]
    fn test_contains_phrase() {
        let tokens = tokenize("I love machine learning and hiking.");
        assert!(tokens.contains_phrase(&normalize_phrase("Machine Learning")));
        assert!(!tokens.contains_phrase(&normalize_phrase("deep learning")));
        assert!(!tokens.contains_phrase(&[]));
    }

    #[test]
    fn test_normalize_phrase() {
        assert_eq!(normalize_phrase("  You KNOW "), vec!["you", "know"]);
        assert!(normalize_phrase("!!!").is_empty());
    }
}
