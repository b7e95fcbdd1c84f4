//! Stock openings. Only the first line can open a post, so at most one hit.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};

/// Openings that almost always come from a template
pub const STRONG_OPENINGS: &[&str] = &[
    "here are",
    "let me",
    "today i want",
    "in this post",
    "welcome to",
    "i'm excited to",
    "join me",
];

/// Hooks people use too; weighted lower
pub const CASUAL_OPENINGS: &[&str] = &["quick tip", "pro tip", "hot take", "unpopular opinion"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    Strong(&'static str),
    Casual(&'static str),
}

/// The opening the text starts with, strong list first
pub fn find_opening(text: &TextProfile) -> Option<Opening> {
    let start = text.lower.trim_start();
    if let Some(phrase) = STRONG_OPENINGS.iter().copied().find(|p| start.starts_with(*p)) {
        return Some(Opening::Strong(phrase));
    }
    CASUAL_OPENINGS
        .iter()
        .copied()
        .find(|p| start.starts_with(*p))
        .map(Opening::Casual)
}

pub struct GenericOpeningRule;

impl GenericOpeningRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericOpeningRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for GenericOpeningRule {
    fn rule(&self) -> Rule {
        Rule::GenericOpening
    }

    fn measure(
        &self,
        text: &TextProfile,
        _scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.generic_opening_count = usize::from(find_opening(text).is_some());
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        match find_opening(text) {
            Some(Opening::Strong(phrase)) => vec![RuleHit::new(
                format!("Generic opening: \"{}\"", phrase),
                scoring.points.generic_opening,
            )],
            Some(Opening::Casual(phrase)) => vec![RuleHit::new(
                format!("Overused hook: \"{}\"", phrase),
                scoring.points.casual_opening,
            )],
            None => vec![],
        }
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Open with the point itself, a number, or something that happened to you")
    }
}
