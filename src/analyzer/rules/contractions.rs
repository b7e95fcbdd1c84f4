//! Missing contractions. Substring presence is enough; no tokenizing.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};

const CONTRACTION_MARKERS: &[&str] = &["'m", "'re", "'ve", "'ll", "n't", "'d"];

pub fn has_contractions(text: &TextProfile) -> bool {
    CONTRACTION_MARKERS.iter().any(|m| text.lower.contains(m))
}

pub struct ContractionsRule;

impl ContractionsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContractionsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for ContractionsRule {
    fn rule(&self) -> Rule {
        Rule::MissingContractions
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.has_contractions = has_contractions(text);
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        if !text.exceeds(scoring.short_content_chars) || has_contractions(text) {
            return vec![];
        }
        vec![RuleHit::new(
            "No contractions - reads stiff and formal",
            scoring.points.missing_contractions,
        )]
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Use contractions the way people talk: I'm, don't, it's, we'll")
    }
}
