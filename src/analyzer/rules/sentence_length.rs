//! Long average sentence length. LLM prose runs long and even; posts don't.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};

pub struct SentenceLengthRule;

impl SentenceLengthRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SentenceLengthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for SentenceLengthRule {
    fn rule(&self) -> Rule {
        Rule::LongSentences
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.average_sentence_length = (text.average_sentence_length() * 10.0).round() / 10.0;
        metrics.sentence_count = text.sentence_count();
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        let avg = text.average_sentence_length();
        if avg > scoring.long_sentence_words {
            return vec![RuleHit::new(
                format!(
                    "Long sentences: {:.1} words on average (over {})",
                    avg, scoring.long_sentence_words
                ),
                scoring.points.long_sentences,
            )];
        }
        match scoring.points.moderate_sentences {
            Some(points) if avg > scoring.moderate_sentence_words => vec![RuleHit::new(
                format!(
                    "Fairly long sentences: {:.1} words on average (over {})",
                    avg, scoring.moderate_sentence_words
                ),
                points,
            )],
            _ => vec![],
        }
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Break long sentences up and mix in some short ones")
    }
}
