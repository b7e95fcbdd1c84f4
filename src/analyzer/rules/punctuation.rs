//! Em-dashes, semicolons and stacked colons

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};

/// Which complex marks appear in the text
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PunctuationSignals {
    pub em_dash: bool,
    pub semicolon: bool,
    pub colons: usize,
}

impl PunctuationSignals {
    pub fn scan(text: &TextProfile) -> Self {
        let mut signals = Self::default();
        for c in text.raw.chars() {
            match c {
                '\u{2014}' => signals.em_dash = true,
                ';' => signals.semicolon = true,
                ':' => signals.colons += 1,
                _ => {}
            }
        }
        signals
    }

    pub fn is_complex(&self) -> bool {
        self.em_dash || self.semicolon || self.colons > 1
    }

    fn describe(&self) -> String {
        let mut found = Vec::new();
        if self.em_dash {
            found.push("em-dash".to_string());
        }
        if self.semicolon {
            found.push("semicolon".to_string());
        }
        if self.colons > 1 {
            found.push(format!("{} colons", self.colons));
        }
        found.join(", ")
    }
}

pub struct PunctuationRule;

impl PunctuationRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PunctuationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for PunctuationRule {
    fn rule(&self) -> Rule {
        Rule::ComplexPunctuation
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.has_complex_punctuation = PunctuationSignals::scan(text).is_complex();
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        let signals = PunctuationSignals::scan(text);
        if !signals.is_complex() {
            return vec![];
        }
        vec![RuleHit::new(
            format!("Complex punctuation ({})", signals.describe()),
            scoring.points.complex_punctuation,
        )]
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Swap em-dashes and semicolons for periods or commas")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(content: &str) -> Vec<RuleHit> {
        PunctuationRule::new().evaluate(&TextProfile::new(content), &ScoringConfig::default())
    }

    #[test]
    fn test_em_dash() {
        let hits = evaluate("It works \u{2014} mostly");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].points, 10);
        assert_eq!(hits[0].flag, "Complex punctuation (em-dash)");
    }

    #[test]
    fn test_semicolon() {
        assert_eq!(evaluate("It works; mostly").len(), 1);
    }

    #[test]
    fn test_single_colon_is_fine() {
        assert!(evaluate("Note: it works").is_empty());
    }

    #[test]
    fn test_two_colons() {
        let hits = evaluate("Step one: plan. Step two: ship.");
        assert_eq!(hits[0].flag, "Complex punctuation (2 colons)");
    }

    #[test]
    fn test_hyphen_and_en_dash_are_fine() {
        assert!(evaluate("well-known 2019\u{2013}2020 - fine").is_empty());
    }

    #[test]
    fn test_everything_at_once_is_one_hit() {
        let hits = evaluate("a \u{2014} b; c: d: e");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].flag,
            "Complex punctuation (em-dash, semicolon, 2 colons)"
        );
    }
}
