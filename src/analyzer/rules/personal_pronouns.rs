//! Missing first-person voice.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};
use once_cell::sync::Lazy;
use regex::Regex;

static PRONOUNS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:i|i'm|i've|i'll|my|me|we|we're|our)\b")
        .expect("pronoun pattern compiles")
});

pub fn has_personal_pronouns(text: &TextProfile) -> bool {
    PRONOUNS.is_match(&text.normalized)
}

pub struct PersonalPronounsRule;

impl PersonalPronounsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PersonalPronounsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for PersonalPronounsRule {
    fn rule(&self) -> Rule {
        Rule::MissingPronouns
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.has_personal_pronouns = has_personal_pronouns(text);
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        // Short replies often drop the subject entirely; don't punish that
        if !text.exceeds(scoring.short_content_chars) || has_personal_pronouns(text) {
            return vec![];
        }
        vec![RuleHit::new(
            "No personal pronouns (I, my, we, our) - reads impersonal",
            scoring.points.missing_pronouns,
        )]
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Write from your own point of view with I, my, we or our")
    }
}
