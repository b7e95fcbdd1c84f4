//! Scoring configuration and score calculation
//!
//! Every point value and threshold lives in [`ScoringConfig`]. The two named
//! profiles are the only place the rule table differs between variants.

use crate::{Contribution, RiskLevel, Rule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named rule-table variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringProfile {
    /// Full rule table with the two-tier sentence length rule
    #[default]
    Standard,
    /// Five core rules, flat sentence length rule, heavier pronoun penalty
    Basic,
}

impl std::fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringProfile::Standard => write!(f, "standard"),
            ScoringProfile::Basic => write!(f, "basic"),
        }
    }
}

impl std::str::FromStr for ScoringProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ScoringProfile::Standard),
            "basic" => Ok(ScoringProfile::Basic),
            other => Err(format!(
                "unknown profile '{}' (expected standard or basic)",
                other
            )),
        }
    }
}

/// Points per rule. Human-signal rules carry negative values.
#[derive(Debug, Clone, PartialEq)]
pub struct RulePoints {
    /// Per buzzword occurrence
    pub buzzword: i32,
    /// Average sentence length above `long_sentence_words`
    pub long_sentences: i32,
    /// Average sentence length above `moderate_sentence_words`; None disables the tier
    pub moderate_sentences: Option<i32>,
    pub missing_pronouns: i32,
    pub missing_contractions: i32,
    pub complex_punctuation: i32,
    pub parallel_structure: i32,
    /// Stock openings ("Here are", "Let me", ...)
    pub generic_opening: i32,
    /// Hooks humans use too ("Pro tip", "Hot take", ...)
    pub casual_opening: i32,
    pub excessive_exclamations: i32,
    pub emoji: i32,
    /// Per distinct fragment pattern
    pub sentence_fragment: i32,
}

impl Default for RulePoints {
    fn default() -> Self {
        Self {
            buzzword: 15,
            long_sentences: 20,
            moderate_sentences: Some(10),
            missing_pronouns: 15,
            missing_contractions: 15,
            complex_punctuation: 10,
            parallel_structure: 15,
            generic_opening: 10,
            casual_opening: 5,
            excessive_exclamations: 5,
            emoji: -5,
            sentence_fragment: -3,
        }
    }
}

impl RulePoints {
    /// Override the primary point value of a rule
    pub fn set(&mut self, rule: Rule, points: i32) {
        match rule {
            Rule::AiBuzzword => self.buzzword = points,
            Rule::LongSentences => self.long_sentences = points,
            Rule::MissingPronouns => self.missing_pronouns = points,
            Rule::MissingContractions => self.missing_contractions = points,
            Rule::ComplexPunctuation => self.complex_punctuation = points,
            Rule::ParallelStructure => self.parallel_structure = points,
            Rule::GenericOpening => self.generic_opening = points,
            Rule::ExcessiveExclamations => self.excessive_exclamations = points,
            Rule::Emoji => self.emoji = points,
            Rule::SentenceFragments => self.sentence_fragment = points,
        }
    }
}

/// Lower bounds of the LOW, MEDIUM and HIGH buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelThresholds {
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            low: 20,
            medium: 40,
            high: 60,
        }
    }
}

impl LevelThresholds {
    pub fn level_for(&self, score: u8) -> RiskLevel {
        if score < self.low {
            RiskLevel::Minimal
        } else if score < self.medium {
            RiskLevel::Low
        } else if score < self.high {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// A text passes while it stays below the MEDIUM bucket
    pub fn passes(&self, score: u8) -> bool {
        score < self.medium
    }
}

/// The single authoritative rule table configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub profile: ScoringProfile,
    pub points: RulePoints,
    /// Rules that are measured but never scored
    pub disabled: BTreeSet<Rule>,
    pub long_sentence_words: f64,
    pub moderate_sentence_words: f64,
    /// Content at or under this many characters is exempt from the "missing" rules
    pub short_content_chars: usize,
    pub min_parallel_bullets: usize,
    /// Max length difference (chars) from the first bullet for a list to count as parallel
    pub bullet_length_tolerance: usize,
    pub max_exclamations: usize,
    pub levels: LevelThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::for_profile(ScoringProfile::Standard)
    }
}

impl ScoringConfig {
    pub fn for_profile(profile: ScoringProfile) -> Self {
        let standard = Self {
            profile,
            points: RulePoints::default(),
            disabled: BTreeSet::new(),
            long_sentence_words: 25.0,
            moderate_sentence_words: 20.0,
            short_content_chars: 50,
            min_parallel_bullets: 3,
            bullet_length_tolerance: 10,
            max_exclamations: 3,
            levels: LevelThresholds::default(),
        };
        match profile {
            ScoringProfile::Standard => standard,
            ScoringProfile::Basic => Self {
                points: RulePoints {
                    moderate_sentences: None,
                    missing_pronouns: 25,
                    ..RulePoints::default()
                },
                disabled: [
                    Rule::ParallelStructure,
                    Rule::GenericOpening,
                    Rule::ExcessiveExclamations,
                    Rule::Emoji,
                    Rule::SentenceFragments,
                ]
                .into_iter()
                .collect(),
                ..standard
            },
        }
    }

    pub fn is_enabled(&self, rule: Rule) -> bool {
        !self.disabled.contains(&rule)
    }

    pub fn disable(&mut self, rule: Rule) {
        self.disabled.insert(rule);
    }

    pub fn enable(&mut self, rule: Rule) {
        self.disabled.remove(&rule);
    }
}

/// Calculator for risk scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Sum all contributions and clamp to 0-100
    pub fn total(contributions: &[Contribution]) -> u8 {
        let sum: i32 = contributions.iter().map(|c| c.points).sum();
        sum.clamp(0, 100) as u8
    }

    /// Append a recommendation unless an identical one is already present
    pub fn push_recommendation(recommendations: &mut Vec<String>, recommendation: &str) {
        if !recommendations.iter().any(|r| r == recommendation) {
            recommendations.push(recommendation.to_string());
        }
    }

    /// Get a description of the risk level
    pub fn level_description(level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Minimal => "Minimal - Reads like a person wrote it",
            RiskLevel::Low => "Low - Mostly natural, a few AI tells",
            RiskLevel::Medium => "Medium - Several patterns typical of AI-generated text",
            RiskLevel::High => "High - Very likely to be flagged as AI-generated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(points: i32) -> Contribution {
        Contribution {
            rule: Rule::AiBuzzword,
            points,
            flag: "flag".to_string(),
        }
    }

    #[test]
    fn test_total_clamps_to_zero() {
        let total = ScoreCalculator::total(&[contribution(3), contribution(-5)]);
        assert_eq!(total, 0);
    }

    #[test]
    fn test_total_clamps_to_hundred() {
        let hits: Vec<_> = (0..10).map(|_| contribution(15)).collect();
        assert_eq!(ScoreCalculator::total(&hits), 100);
    }

    #[test]
    fn test_total_empty_is_zero() {
        assert_eq!(ScoreCalculator::total(&[]), 0);
    }

    #[test]
    fn test_total_mixed_signs() {
        let total =
            ScoreCalculator::total(&[contribution(15), contribution(10), contribution(-3)]);
        assert_eq!(total, 22);
    }

    #[test]
    fn test_level_thresholds_are_exclusive_upper_bounds() {
        let levels = LevelThresholds::default();
        assert_eq!(levels.level_for(19), RiskLevel::Minimal);
        assert_eq!(levels.level_for(20), RiskLevel::Low);
        assert_eq!(levels.level_for(39), RiskLevel::Low);
        assert_eq!(levels.level_for(40), RiskLevel::Medium);
        assert_eq!(levels.level_for(59), RiskLevel::Medium);
        assert_eq!(levels.level_for(60), RiskLevel::High);
    }

    #[test]
    fn test_passes_below_forty() {
        let levels = LevelThresholds::default();
        assert!(levels.passes(39));
        assert!(!levels.passes(40));
    }

    #[test]
    fn test_push_recommendation_dedupes() {
        let mut recs = Vec::new();
        ScoreCalculator::push_recommendation(&mut recs, "Use contractions");
        ScoreCalculator::push_recommendation(&mut recs, "Use contractions");
        ScoreCalculator::push_recommendation(&mut recs, "Cut buzzwords");
        assert_eq!(recs, vec!["Use contractions", "Cut buzzwords"]);
    }

    #[test]
    fn test_basic_profile_differs_from_standard() {
        let basic = ScoringConfig::for_profile(ScoringProfile::Basic);
        assert_eq!(basic.points.missing_pronouns, 25);
        assert_eq!(basic.points.moderate_sentences, None);
        assert!(!basic.is_enabled(Rule::Emoji));
        assert!(basic.is_enabled(Rule::AiBuzzword));

        let standard = ScoringConfig::default();
        assert_eq!(standard.points.missing_pronouns, 15);
        assert_eq!(standard.points.moderate_sentences, Some(10));
        assert!(standard.disabled.is_empty());
        assert_eq!(standard.levels, basic.levels);
    }

    #[test]
    fn test_rule_points_set_overrides_primary_value() {
        let mut points = RulePoints::default();
        points.set(Rule::AiBuzzword, 20);
        points.set(Rule::Emoji, -10);
        assert_eq!(points.buzzword, 20);
        assert_eq!(points.emoji, -10);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("basic".parse::<ScoringProfile>(), Ok(ScoringProfile::Basic));
        assert_eq!(
            "STANDARD".parse::<ScoringProfile>(),
            Ok(ScoringProfile::Standard)
        );
        assert!("strict".parse::<ScoringProfile>().is_err());
    }

    #[test]
    fn test_level_description_all_levels() {
        assert!(ScoreCalculator::level_description(RiskLevel::Minimal).contains("Minimal"));
        assert!(ScoreCalculator::level_description(RiskLevel::Low).contains("Low"));
        assert!(ScoreCalculator::level_description(RiskLevel::Medium).contains("Medium"));
        assert!(ScoreCalculator::level_description(RiskLevel::High).contains("High"));
    }
}
