//! Text profile computed once per scoring call and shared by every rule

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence break pattern compiles"));

/// Pre-split view of the input text
#[derive(Debug, Clone)]
pub struct TextProfile<'a> {
    /// Input exactly as given
    pub raw: &'a str,
    /// Input with typographic apostrophes folded to `'`
    pub normalized: String,
    /// Lowercased `normalized`
    pub lower: String,
    /// Length of the input in characters
    pub char_count: usize,
    /// Non-blank pieces between `[.!?]+` runs
    pub sentences: Vec<&'a str>,
    /// Input lines (no terminators)
    pub lines: Vec<&'a str>,
    /// Whitespace-separated tokens in the whole input
    pub word_count: usize,
}

impl<'a> TextProfile<'a> {
    pub fn new(raw: &'a str) -> Self {
        // A leading BOM is not content
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let normalized = raw.replace(['\u{2019}', '\u{2018}'], "'");
        let lower = normalized.to_lowercase();
        let sentences = SENTENCE_BREAK
            .split(raw)
            .filter(|s| !s.trim().is_empty())
            .collect();

        Self {
            raw,
            char_count: raw.chars().count(),
            sentences,
            lines: raw.lines().collect(),
            word_count: raw.split_whitespace().count(),
            normalized,
            lower,
        }
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Mean words per sentence; 0.0 when there are no sentences
    pub fn average_sentence_length(&self) -> f64 {
        if self.sentences.is_empty() {
            return 0.0;
        }
        let words: usize = self
            .sentences
            .iter()
            .map(|s| s.split_whitespace().count())
            .sum();
        words as f64 / self.sentences.len() as f64
    }

    /// Whether the text is long enough for the "missing X" rules to apply
    pub fn exceeds(&self, chars: usize) -> bool {
        self.char_count > chars
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}
