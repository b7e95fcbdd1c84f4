//! Detection engine - folds the rule table over a text

use crate::config::{Config, EffectiveConfig};
use crate::{Contribution, DetectionMetrics, DetectionResult, FileReport, RiskLevel};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::rules::{default_rules, DetectionRule};
use super::scoring::{ScoreCalculator, ScoringConfig};
use super::text::TextProfile;

/// Main detection engine that runs every rule over a text
pub struct DetectionEngine {
    rules: Vec<Box<dyn DetectionRule>>,
    scoring: ScoringConfig,
    /// Attach per-hit contributions to results
    explain: bool,
}

impl DetectionEngine {
    /// Standard profile, built-in buzzwords
    pub fn new() -> Self {
        Self {
            rules: default_rules(&[]),
            scoring: ScoringConfig::default(),
            explain: false,
        }
    }

    /// Engine for a config's base settings (no per-path override)
    pub fn from_config(config: &Config) -> Self {
        Self::from_effective(&config.effective())
    }

    pub fn from_effective(effective: &EffectiveConfig) -> Self {
        Self {
            rules: default_rules(&effective.buzzwords),
            scoring: effective.scoring(),
            explain: false,
        }
    }

    /// Replace the scoring configuration
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Include the per-rule breakdown in results
    pub fn with_breakdown(mut self) -> Self {
        self.explain = true;
        self
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Score a block of text
    pub fn score(&self, content: &str) -> DetectionResult {
        let text = TextProfile::new(content);
        let mut metrics = DetectionMetrics {
            word_count: text.word_count,
            ..DetectionMetrics::default()
        };
        let mut contributions: Vec<Contribution> = Vec::new();
        let mut recommendations = Vec::new();

        for rule in &self.rules {
            rule.measure(&text, &self.scoring, &mut metrics);
            if !self.scoring.is_enabled(rule.rule()) {
                continue;
            }
            let hits = rule.evaluate(&text, &self.scoring);
            if hits.is_empty() {
                continue;
            }
            if let Some(recommendation) = rule.recommendation() {
                ScoreCalculator::push_recommendation(&mut recommendations, recommendation);
            }
            for hit in hits {
                tracing::debug!(rule = %rule.rule(), points = hit.points, "{}", hit.flag);
                contributions.push(Contribution {
                    rule: rule.rule(),
                    points: hit.points,
                    flag: hit.flag,
                });
            }
        }

        let risk_score = ScoreCalculator::total(&contributions);
        DetectionResult {
            risk_score,
            risk_level: self.scoring.levels.level_for(risk_score),
            passed: self.scoring.levels.passes(risk_score),
            flags: contributions.iter().map(|c| c.flag.clone()).collect(),
            recommendations,
            metrics,
            breakdown: self.explain.then_some(contributions),
        }
    }

    /// Score a draft file. Per-path overrides in `config` take effect for this file.
    pub fn score_file(&self, path: &Path, config: Option<&Config>) -> Result<FileReport> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let content = String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8 text", path.display()))?;

        let result = match config {
            Some(cfg) if cfg.has_override_for(path) => {
                let mut engine = Self::from_effective(&cfg.effective_for_file(path));
                engine.explain = self.explain;
                engine.score(&content)
            }
            _ => self.score(&content),
        };
        tracing::debug!(
            file = %path.display(),
            risk = result.risk_score,
            "scored file"
        );

        Ok(FileReport {
            file_path: path.to_path_buf(),
            digest: crate::history::content_digest(&content),
            result,
        })
    }

    /// Score multiple files sequentially
    pub fn score_many(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<FileReport>> {
        paths.iter().map(|p| self.score_file(p, config)).collect()
    }

    /// Score multiple files in parallel using rayon
    pub fn score_parallel(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<FileReport>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.score_file(p, config)).collect()
    }

    /// Get aggregate stats from multiple reports
    pub fn aggregate_stats(reports: &[FileReport]) -> AggregateStats {
        if reports.is_empty() {
            return AggregateStats::default();
        }

        let total_risk: u32 = reports.iter().map(|r| r.result.risk_score as u32).sum();
        let average_risk = (total_risk / reports.len() as u32) as u8;

        AggregateStats {
            files_scored: reports.len(),
            average_risk,
            average_level: RiskLevel::from_score(average_risk),
            passed: reports.iter().filter(|r| r.result.passed).count(),
            total_flags: reports.iter().map(|r| r.result.flags.len()).sum(),
        }
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics from multiple scored files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    pub files_scored: usize,
    /// Mean risk score, rounded down
    pub average_risk: u8,
    pub average_level: RiskLevel,
    /// Files below the pass boundary
    pub passed: usize,
    pub total_flags: usize,
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self {
            files_scored: 0,
            average_risk: 0,
            average_level: RiskLevel::Minimal,
            passed: 0,
            total_flags: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::scoring::ScoringProfile;
    use crate::Rule;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_draft(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_buzzword_repeats_and_recommendation_dedup() {
        let result = DetectionEngine::new().score("delve delve leverage");
        assert_eq!(result.risk_score, 45);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(!result.passed);
        assert_eq!(result.flags.len(), 3);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.metrics.buzzword_count, 3);
    }

    #[test]
    fn test_empty_text() {
        let result = DetectionEngine::new().score("");
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.risk_level, RiskLevel::Minimal);
        assert!(result.passed);
        assert!(result.flags.is_empty());
        assert!(result.recommendations.is_empty());
        assert_eq!(result.metrics.average_sentence_length, 0.0);
    }

    #[test]
    fn test_human_signals_floor_at_zero() {
        let result = DetectionEngine::new().score("lol 🚀");
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.flags.len(), 2);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_flags_follow_rule_order() {
        let engine = DetectionEngine::new().with_breakdown();
        let result = engine.score("Here are the robust results; enjoy them!!!! 🚀");
        let rules: Vec<Rule> = result
            .breakdown
            .unwrap()
            .iter()
            .map(|c| c.rule)
            .collect();
        let mut sorted = rules.clone();
        sorted.sort();
        assert_eq!(rules, sorted);
        assert_eq!(rules.first(), Some(&Rule::AiBuzzword));
        assert_eq!(rules.last(), Some(&Rule::Emoji));
    }

    #[test]
    fn test_breakdown_sums_to_score_when_unclamped() {
        let engine = DetectionEngine::new().with_breakdown();
        let result = engine.score("We leverage synergy; it's great");
        let breakdown = result.breakdown.unwrap();
        let sum: i32 = breakdown.iter().map(|c| c.points).sum();
        assert_eq!(sum, result.risk_score as i32);
        assert_eq!(breakdown.len(), result.flags.len());
    }

    #[test]
    fn test_no_breakdown_by_default() {
        assert!(DetectionEngine::new().score("delve").breakdown.is_none());
    }

    #[test]
    fn test_disabled_rule_still_measures() {
        let mut scoring = ScoringConfig::default();
        scoring.disable(Rule::AiBuzzword);
        let engine = DetectionEngine::new().with_scoring(scoring);
        let result = engine.score("delve");
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.metrics.buzzword_count, 1);
    }

    #[test]
    fn test_basic_profile_ignores_extra_rules() {
        let engine =
            DetectionEngine::new().with_scoring(ScoringConfig::for_profile(ScoringProfile::Basic));
        let result = engine.score("Here are my tips!!!! 🚀");
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.metrics.generic_opening_count, 1);
        assert!(result.metrics.has_excessive_exclamations);
    }

    #[test]
    fn test_extra_buzzwords_from_config() {
        let config: Config =
            serde_json::from_str(r#"{"buzzwords": ["holistic"], "rules": {"ai-buzzword": 20}}"#)
                .unwrap();
        let engine = DetectionEngine::from_config(&config);
        let result = engine.score("holistic");
        assert_eq!(result.risk_score, 20);
    }

    #[test]
    fn test_score_file_sets_digest_and_path() {
        let file = make_draft("just shipped it");
        let report = DetectionEngine::new().score_file(file.path(), None).unwrap();
        assert_eq!(report.file_path, file.path());
        assert_eq!(report.digest.len(), 64);
        assert_eq!(report.result, DetectionEngine::new().score("just shipped it"));
    }

    #[test]
    fn test_score_file_strips_bom() {
        let file = make_draft("\u{feff}Wild.");
        let report = DetectionEngine::new().score_file(file.path(), None).unwrap();
        assert_eq!(report.result.metrics.fragment_signals, 1);
    }

    #[test]
    fn test_score_file_missing_names_path() {
        let err = DetectionEngine::new()
            .score_file(Path::new("/definitely/not/here.txt"), None)
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_score_file_rejects_binary() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();
        file.flush().unwrap();
        assert!(DetectionEngine::new().score_file(file.path(), None).is_err());
    }

    #[test]
    fn test_score_file_applies_override() {
        let file = make_draft("delve");
        let pattern = format!("**/{}", file.path().file_name().unwrap().to_string_lossy());
        let config: Config = serde_json::from_str(&format!(
            r#"{{"overrides": [{{"files": ["{}"], "rules": {{"ai-buzzword": "off"}}}}]}}"#,
            pattern
        ))
        .unwrap();
        let engine = DetectionEngine::from_config(&config);
        let report = engine.score_file(file.path(), Some(&config)).unwrap();
        assert_eq!(report.result.risk_score, 0);
    }

    #[test]
    fn test_score_parallel_matches_sequential() {
        let files: Vec<NamedTempFile> = ["delve", "lol ok", "Here are 3 tips"]
            .iter()
            .map(|c| make_draft(c))
            .collect();
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();
        let engine = DetectionEngine::new();
        let seq: Vec<u8> = engine
            .score_many(&paths, None)
            .into_iter()
            .map(|r| r.unwrap().result.risk_score)
            .collect();
        let par: Vec<u8> = engine
            .score_parallel(&paths, None)
            .into_iter()
            .map(|r| r.unwrap().result.risk_score)
            .collect();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_aggregate_stats_empty() {
        let stats = DetectionEngine::aggregate_stats(&[]);
        assert_eq!(stats, AggregateStats::default());
    }

    #[test]
    fn test_aggregate_stats_multiple() {
        let engine = DetectionEngine::new();
        let a = make_draft("delve delve leverage");
        let b = make_draft("lol 🚀");
        let reports = vec![
            engine.score_file(a.path(), None).unwrap(),
            engine.score_file(b.path(), None).unwrap(),
        ];
        let stats = DetectionEngine::aggregate_stats(&reports);
        assert_eq!(stats.files_scored, 2);
        assert_eq!(stats.average_risk, 22);
        assert_eq!(stats.average_level, RiskLevel::Low);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.total_flags, 5);
    }
}
