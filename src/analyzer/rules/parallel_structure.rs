//! Templated bullet lists: several bullets whose lengths barely differ.

use super::{DetectionRule, RuleHit};
use crate::analyzer::scoring::ScoringConfig;
use crate::analyzer::text::TextProfile;
use crate::{DetectionMetrics, Rule};
use once_cell::sync::Lazy;
use regex::Regex;

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•*]\s").expect("bullet pattern compiles"));

/// Character lengths of bullet lines, in order
fn bullet_lengths(text: &TextProfile) -> Vec<usize> {
    text.lines
        .iter()
        .filter(|line| BULLET.is_match(line))
        .map(|line| line.trim_end().chars().count())
        .collect()
}

/// True when there are enough bullets and every one is within tolerance of the first
pub fn is_perfectly_parallel(text: &TextProfile, scoring: &ScoringConfig) -> bool {
    let lengths = bullet_lengths(text);
    if lengths.len() < scoring.min_parallel_bullets {
        return false;
    }
    let first = lengths[0];
    lengths
        .iter()
        .all(|len| len.abs_diff(first) <= scoring.bullet_length_tolerance)
}

pub struct ParallelStructureRule;

impl ParallelStructureRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParallelStructureRule {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionRule for ParallelStructureRule {
    fn rule(&self) -> Rule {
        Rule::ParallelStructure
    }

    fn measure(
        &self,
        text: &TextProfile,
        scoring: &ScoringConfig,
        metrics: &mut DetectionMetrics,
    ) {
        metrics.has_perfect_parallel_structure = is_perfectly_parallel(text, scoring);
    }

    fn evaluate(&self, text: &TextProfile, scoring: &ScoringConfig) -> Vec<RuleHit> {
        if !is_perfectly_parallel(text, scoring) {
            return vec![];
        }
        vec![RuleHit::new(
            format!(
                "Perfect parallel structure: {} bullets of near-identical length",
                bullet_lengths(text).len()
            ),
            scoring.points.parallel_structure,
        )]
    }

    fn recommendation(&self) -> Option<&'static str> {
        Some("Vary your list items, or write it as a short paragraph")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(content: &str) -> Vec<RuleHit> {
        ParallelStructureRule::new().evaluate(&TextProfile::new(content), &ScoringConfig::default())
    }

    #[test]
    fn test_three_even_bullets() {
        let hits = evaluate("- Ship faster today\n- Test more often\n- Learn every week");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].points, 15);
        assert!(hits[0].flag.contains("3 bullets"));
    }

    #[test]
    fn test_all_bullet_markers() {
        assert_eq!(evaluate("* one thing\n• two thing\n- red thing").len(), 1);
    }

    #[test]
    fn test_two_bullets_are_not_enough() {
        assert!(evaluate("- Ship faster today\n- Test more often").is_empty());
    }

    #[test]
    fn test_uneven_bullets() {
        let content = "- Ship\n- Test more often than you think you need to\n- Learn";
        assert!(evaluate(content).is_empty());
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        // First bullet 12 chars, last 22 chars: exactly 10 apart
        let content = "- abcdefghij\n- abcdefghijkl\n- abcdefghijklmnopqrst";
        assert_eq!(evaluate(content).len(), 1);
        let content = "- abcdefghij\n- abcdefghijkl\n- abcdefghijklmnopqrstu";
        assert!(evaluate(content).is_empty());
    }

    #[test]
    fn test_indented_bullets_do_not_count() {
        assert!(evaluate("  - one\n  - two\n  - six").is_empty());
    }

    #[test]
    fn test_marker_needs_whitespace() {
        assert!(evaluate("-one\n-two\n-six").is_empty());
    }

    #[test]
    fn test_bullets_between_prose() {
        let content = "Three things:\n- Ship it today\nand then\n- Test it later\n- Fix it again";
        assert_eq!(evaluate(content).len(), 1);
    }

    #[test]
    fn test_measure_sets_metric() {
        let mut metrics = DetectionMetrics::default();
        let text = TextProfile::new("- aa\n- bb\n- cc");
        ParallelStructureRule::new().measure(&text, &ScoringConfig::default(), &mut metrics);
        assert!(metrics.has_perfect_parallel_structure);
    }
}
