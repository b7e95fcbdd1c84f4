use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};

fn exclamation_count(text: &TextProfile) -> usize {
    text.raw.matches('!').count()
}

/// More `!` than a person usually types in one post
pub struct ExclamationsRule;

impl ExclamationsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExclamationsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for ExclamationsRule {
    fn rule(&self) -> Rule {
        Rule::ExcessiveExclamations
    }

    fn measure(
        &self,
        text: &TextProfile,
        scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.has_excessive_exclamations = exclamation_count(text) > scoring.max_exclamations;
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        let count = exclamation_count(text);
        if count <= scoring.max_exclamations {
            return vec![];
        }
        vec![RuleHit::new(
            format!("Too many exclamation marks ({})", count),
            scoring.points.excessive_exclamations,
        )]
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Keep one exclamation mark at most and let the words carry the energy")
    }
}
