//! Words and phrases that show up far more in LLM output than in people's posts.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_BUZZWORDS: &[&str] = &[
    "delve",
    "leverage",
    "tapestry",
    "synergy",
    "robust",
    "paradigm",
    "seamless",
    "elevate",
    "optimize",
    "streamline",
    "empower",
    "dynamic",
    "unlock",
    "harness",
    "landscape",
    "comprehensive",
    "innovative",
    "cutting-edge",
    "revolutionary",
    "game-changer",
    "dive deep",
    "unpack",
];

static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    build_pattern(DEFAULT_BUZZWORDS.iter().copied()).expect("buzzword pattern compiles")
});

/// Case-insensitive whole-word alternation. Spaces inside a phrase match any whitespace run.
fn build_pattern<'a>(terms: impl Iterator<Item = &'a str>) -> Result<Regex, regex::Error> {
    let mut terms: Vec<String> = terms
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    // Longest first so a phrase wins over a word it starts with
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    let alternation = terms
        .iter()
        .map(|t| {
            t.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
}

/// Rule that counts every buzzword occurrence
pub struct BuzzwordRule {
    pattern: Regex,
}

impl BuzzwordRule {
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }

    /// Built-in list plus `extra` terms
    pub fn with_extra(extra: &[String]) -> Self {
        if extra.iter().all(|t| t.trim().is_empty()) {
            return Self::new();
        }
        let terms = DEFAULT_BUZZWORDS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str));
        match build_pattern(terms) {
            Ok(pattern) => Self { pattern },
            Err(e) => {
                tracing::warn!("ignoring custom buzzwords: {}", e);
                Self::new()
            }
        }
    }

    /// Matched buzzwords in order of appearance, lowercased
    pub fn matches(&self, text: &TextProfile) -> Vec<String> {
        self.pattern
            .find_iter(&text.normalized)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }
}

impl Default for BuzzwordRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for BuzzwordRule {
    fn rule(&self) -> Rule {
        Rule::AiBuzzword
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.buzzword_count = self.pattern.find_iter(&text.normalized).count();
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        self.matches(text)
            .into_iter()
            .map(|word| {
                RuleHit::new(
                    format!("AI buzzword detected: \"{}\"", word),
                    scoring.points.buzzword,
                )
            })
            .collect()
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Swap buzzwords for plain, specific words you would actually say out loud")
    }
}
