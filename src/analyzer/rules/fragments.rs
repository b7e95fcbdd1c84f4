//! Sentence fragments and casual fillers. A human signal: subtracts points.
//!
//! Three independent patterns, each counted once however often it appears:
//! a line that is one capitalized word and a period ("Wild."), an ellipsis,
//! and a line opening with a filler word.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};
use once_cell::sync::Lazy;
use regex::Regex;

static ONE_WORD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Lu}[\p{L}']*\.$").expect("one-word line pattern compiles"));

static FILLER_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:lol|idk|ngl|tbh|honestly|basically)\b")
        .expect("filler pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentPattern {
    OneWordLine,
    Ellipsis,
    FillerOpener,
}

impl FragmentPattern {
    fn describe(&self) -> &'static str {
        match self {
            FragmentPattern::OneWordLine => "one-word sentence",
            FragmentPattern::Ellipsis => "ellipsis",
            FragmentPattern::FillerOpener => "casual filler",
        }
    }
}

/// Distinct fragment patterns present, in a fixed order
pub fn fragment_patterns(text: &TextProfile) -> Vec<FragmentPattern> {
    let mut found = Vec::new();
    let trimmed_lines = || text.lines.iter().map(|line| line.trim());

    if trimmed_lines().any(|line| ONE_WORD_LINE.is_match(line)) {
        found.push(FragmentPattern::OneWordLine);
    }
    if text.raw.contains("...") || text.raw.contains('\u{2026}') {
        found.push(FragmentPattern::Ellipsis);
    }
    if trimmed_lines().any(|line| FILLER_OPENER.is_match(line)) {
        found.push(FragmentPattern::FillerOpener);
    }
    found
}

pub struct FragmentsRule;

impl FragmentsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FragmentsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for FragmentsRule {
    fn rule(&self) -> Rule {
        Rule::SentenceFragments
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.fragment_signals = fragment_patterns(text).len();
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        fragment_patterns(text)
            .into_iter()
            .map(|pattern| {
                RuleHit::new(
                    format!("Casual writing: {} (human signal)", pattern.describe()),
                    scoring.points.sentence_fragment,
                )
            })
            .collect()
    }

    fn recommendation(&self) -> Option<&'static str> {
        None
    }
}
