//! Emoji presence. A human signal: subtracts points.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};

/// Pictographs, misc symbols and dingbats
pub fn is_emoji(c: char) -> bool {
    matches!(c, '\u{1F300}'..='\u{1F9FF}' | '\u{2600}'..='\u{26FF}' | '\u{2700}'..='\u{27BF}')
}

pub fn has_emoji(text: &TextProfile) -> bool {
    text.raw.chars().any(is_emoji)
}

pub struct EmojiRule;

impl EmojiRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmojiRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for EmojiRule {
    fn rule(&self) -> Rule {
        Rule::Emoji
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.has_emoji = has_emoji(text);
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        if !has_emoji(text) {
            return vec![];
        }
        vec![RuleHit::new(
            "Emoji present (human signal)",
            scoring.points.emoji,
        )]
    }

    fn recommendation(&self) -> Option<&'static str> {
        None
    }
}
