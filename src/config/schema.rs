//! Config schema and deserialization

use crate::analyzer::scoring::{ScoringConfig, ScoringProfile};
use crate::Rule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default draft extensions scanned when a directory is given
pub const DEFAULT_EXTENSIONS: &[&str] = &[".txt", ".md", ".markdown", ".post"];

/// Turn a rule on or off without touching its points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleToggle {
    On,
    Off,
}

/// Per-rule setting: `"off"`, `"on"`, or a point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    Toggle(RuleToggle),
    Points(i32),
}

impl RuleSetting {
    pub fn is_off(&self) -> bool {
        matches!(self, RuleSetting::Toggle(RuleToggle::Off))
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    #[serde(default)]
    pub profile: Option<ScoringProfile>,

    /// Optional threshold override for matched files
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Optional rule overrides for matched files
    #[serde(default)]
    pub rules: HashMap<String, RuleSetting>,
}

/// Root config structure for .postcheckrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Rule table variant (default: standard)
    #[serde(default)]
    pub profile: Option<ScoringProfile>,

    /// Maximum allowed risk score (exit 1 at or above it)
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Per-rule overrides. Key is the rule id in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSetting>,

    /// Extra terms added to the built-in buzzword list
    #[serde(default)]
    pub buzzwords: Vec<String>,

    /// Glob patterns for files/directories to skip
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Draft file extensions (default: .txt, .md, .markdown, .post)
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,

    /// Command-line values; these beat per-path overrides too
    #[serde(skip)]
    cli_profile: Option<ScoringProfile>,
    #[serde(skip)]
    cli_threshold: Option<u8>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_threshold: Option<u8>,
        cli_profile: Option<ScoringProfile>,
    ) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
            self.cli_threshold = cli_threshold;
        }
        if cli_profile.is_some() {
            self.profile = cli_profile;
            self.cli_profile = cli_profile;
        }
        self
    }

    pub fn rule_setting(&self, rule_id: &str) -> Option<RuleSetting> {
        self.rules.get(rule_id).copied()
    }

    /// Config with no per-path override applied
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            profile: self.profile.unwrap_or_default(),
            threshold: self.threshold,
            rules: self.rules.clone(),
            buzzwords: self.buzzwords.clone(),
        }
    }

    /// Get effective config for a specific file path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = self.effective();

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(profile) = override_cfg.profile {
                    effective.profile = profile;
                }
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                for (rule, setting) in &override_cfg.rules {
                    effective.rules.insert(rule.clone(), *setting);
                }
            }
        }

        if let Some(profile) = self.cli_profile {
            effective.profile = profile;
        }
        if let Some(threshold) = self.cli_threshold {
            effective.threshold = Some(threshold);
        }
        effective
    }

    /// Whether any override matches this path
    pub fn has_override_for(&self, file_path: &Path) -> bool {
        self.overrides
            .iter()
            .any(|o| Self::matches_override(file_path, &o.files))
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        for pattern in patterns {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
                {
                    return true;
                }
            }
        }
        false
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.profile.is_none() {
            self.profile = base.profile;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        for (rule, setting) in base.rules {
            self.rules.entry(rule).or_insert(setting);
        }

        let mut all_buzzwords = base.buzzwords;
        for word in self.buzzwords.drain(..) {
            if !all_buzzwords.contains(&word) {
                all_buzzwords.push(word);
            }
        }
        self.buzzwords = all_buzzwords;

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.extensions.is_empty() {
            self.extensions = base.extensions;
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Draft extensions, with a leading dot
    pub fn get_extensions(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.extensions
                .iter()
                .map(|e| {
                    if e.starts_with('.') {
                        e.clone()
                    } else {
                        format!(".{}", e)
                    }
                })
                .collect()
        }
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub profile: ScoringProfile,
    pub threshold: Option<u8>,
    pub rules: HashMap<String, RuleSetting>,
    pub buzzwords: Vec<String>,
}

impl EffectiveConfig {
    /// Build the rule table configuration: profile defaults, then rule settings
    pub fn scoring(&self) -> ScoringConfig {
        let mut scoring = ScoringConfig::for_profile(self.profile);
        // Sorted so a bad config warns in a stable order
        let mut ids: Vec<&String> = self.rules.keys().collect();
        ids.sort();
        for id in ids {
            let Some(rule) = Rule::from_id(id) else {
                tracing::warn!("unknown rule '{}' in config, ignoring", id);
                continue;
            };
            match self.rules[id] {
                RuleSetting::Toggle(RuleToggle::Off) => scoring.disable(rule),
                RuleSetting::Toggle(RuleToggle::On) => scoring.enable(rule),
                RuleSetting::Points(points) => {
                    scoring.enable(rule);
                    scoring.points.set(rule, points);
                }
            }
        }
        scoring
    }
}
