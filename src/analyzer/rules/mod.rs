//! Detection rules for AI-sounding text
//!
//! Each rule is one entry of the ordered rule table returned by
//! [`default_rules`]. The engine folds over the table once; table order is
//! flag order.

pub mod buzzwords;
pub mod contractions;
pub mod emoji;
pub mod exclamations;
pub mod fragments;
pub mod generic_opening;
pub mod parallel_structure;
pub mod personal_pronouns;
pub mod punctuation;
pub mod sentence_length;

pub use buzzwords::BuzzwordRule;
pub use contractions::ContractionsRule;
pub use emoji::EmojiRule;
pub use exclamations::ExclamationsRule;
pub use fragments::FragmentsRule;
pub use generic_opening::GenericOpeningRule;
pub use parallel_structure::ParallelStructureRule;
pub use personal_pronouns::PersonalPronounsRule;
pub use punctuation::PunctuationRule;
pub use sentence_length::SentenceLengthRule;

use super::scoring::ScoringConfig;
use super::text::TextProfile;
use crate::{DetectionMetrics, Rule};

/// A single triggered rule instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHit {
    pub flag: String,
    pub points: i32,
}

impl RuleHit {
    pub fn new(flag: impl Into<String>, points: i32) -> Self {
        Self {
            flag: flag.into(),
            points,
        }
    }
}

/// Trait for detection rules
pub trait DetectionRule: Send + Sync {
    /// Which rule this is
    fn rule(&self) -> Rule;

    /// Record this rule's raw signal. Runs even when the rule is disabled.
    fn measure(&self, text: &TextProfile, scoring: &ScoringConfig, metrics: &mut DetectionMetrics);

    /// Return one hit per triggered instance
    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit>;

    /// Suggestion shown once when the rule triggers; None for human signals
    fn recommendation(&self) -> Option<&'static str>;
}

/// The ordered rule table. `extra_buzzwords` extends the built-in buzzword list.
pub fn default_rules(extra_buzzwords: &[String]) -> Vec<Box<dyn DetectionRule>> {
    vec![
        Box::new(BuzzwordRule::with_extra(extra_buzzwords)),
        Box::new(SentenceLengthRule::new()),
        Box::new(PersonalPronounsRule::new()),
        Box::new(ContractionsRule::new()),
        Box::new(PunctuationRule::new()),
        Box::new(ParallelStructureRule::new()),
        Box::new(GenericOpeningRule::new()),
        Box::new(ExclamationsRule::new()),
        Box::new(EmojiRule::new()),
        Box::new(FragmentsRule::new()),
    ]
}
