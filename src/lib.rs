//! postcheck: AI-detection risk scoring for social media content
//!
//! This library scores a block of text (a post, reply, thread or video script)
//! for how "AI-generated" it sounds, using pattern-count heuristics, and
//! provides the reporting, configuration and rewrite plumbing around it.

pub mod analyzer;
pub mod config;
pub mod history;
pub mod humanize;
pub mod mcp;
pub mod reporter;
pub mod watcher;

use analyzer::scoring::LevelThresholds;
use analyzer::DetectionEngine;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of scoring one block of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Accumulated risk points, clamped to 0-100
    pub risk_score: u8,
    /// Bucketed risk level derived from the score
    pub risk_level: RiskLevel,
    /// True when the score is below the pass boundary (40 by default)
    pub passed: bool,
    /// One entry per triggered rule instance, in rule order
    pub flags: Vec<String>,
    /// Deduplicated suggestions, one per triggered rule category
    pub recommendations: Vec<String>,
    /// Raw signals measured on the text
    pub metrics: DetectionMetrics,
    /// Per-hit point contributions (only when the engine is asked to explain)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<Contribution>>,
}

impl DetectionResult {
    /// Humanness is the complement of the risk score (100 = reads fully human)
    pub fn humanness(&self) -> u8 {
        100 - self.risk_score
    }
}

/// Risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a score with the default thresholds
    pub fn from_score(score: u8) -> Self {
        LevelThresholds::default().level_for(score)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Minimal => write!(f, "MINIMAL"),
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Signals measured on the text, independent of which rules are enabled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionMetrics {
    /// Mean words per sentence, one decimal
    pub average_sentence_length: f64,
    pub has_personal_pronouns: bool,
    pub has_contractions: bool,
    pub buzzword_count: usize,
    pub has_complex_punctuation: bool,
    pub has_perfect_parallel_structure: bool,
    pub generic_opening_count: usize,
    pub has_excessive_exclamations: bool,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub sentence_count: usize,
    #[serde(default)]
    pub has_emoji: bool,
    /// Number of distinct sentence-fragment patterns seen
    #[serde(default)]
    pub fragment_signals: usize,
}

/// One rule hit and the points it contributed (negative for human signals)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub rule: Rule,
    pub points: i32,
    pub flag: String,
}

/// Detection rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Word or phrase from the AI buzzword list
    AiBuzzword,
    /// Average sentence length above the comfortable range
    LongSentences,
    /// No first-person pronouns in non-trivial content
    MissingPronouns,
    /// No contractions in non-trivial content
    MissingContractions,
    /// Em-dashes, semicolons or repeated colons
    ComplexPunctuation,
    /// Templated bullet list with near-identical line lengths
    ParallelStructure,
    /// Stock opening phrase
    GenericOpening,
    /// More exclamation marks than a person usually types
    ExcessiveExclamations,
    /// Emoji present (human signal)
    Emoji,
    /// Fragments, ellipses, casual fillers (human signal)
    SentenceFragments,
}

impl Rule {
    pub const ALL: [Rule; 10] = [
        Rule::AiBuzzword,
        Rule::LongSentences,
        Rule::MissingPronouns,
        Rule::MissingContractions,
        Rule::ComplexPunctuation,
        Rule::ParallelStructure,
        Rule::GenericOpening,
        Rule::ExcessiveExclamations,
        Rule::Emoji,
        Rule::SentenceFragments,
    ];

    /// Look up a rule by its kebab-case id
    pub fn from_id(id: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|r| r.to_string() == id)
    }

    /// Rules that lower the score instead of raising it
    pub fn is_human_signal(&self) -> bool {
        matches!(self, Rule::Emoji | Rule::SentenceFragments)
    }

    /// Display name for reports
    pub fn category_name(&self) -> &'static str {
        match self {
            Rule::AiBuzzword => "AI Buzzwords",
            Rule::LongSentences => "Sentence Length",
            Rule::MissingPronouns => "Personal Voice",
            Rule::MissingContractions => "Contractions",
            Rule::ComplexPunctuation => "Punctuation",
            Rule::ParallelStructure => "Parallel Structure",
            Rule::GenericOpening => "Opening",
            Rule::ExcessiveExclamations => "Exclamations",
            Rule::Emoji => "Emoji",
            Rule::SentenceFragments => "Fragments",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::AiBuzzword => write!(f, "ai-buzzword"),
            Rule::LongSentences => write!(f, "long-sentences"),
            Rule::MissingPronouns => write!(f, "missing-pronouns"),
            Rule::MissingContractions => write!(f, "missing-contractions"),
            Rule::ComplexPunctuation => write!(f, "complex-punctuation"),
            Rule::ParallelStructure => write!(f, "parallel-structure"),
            Rule::GenericOpening => write!(f, "generic-opening"),
            Rule::ExcessiveExclamations => write!(f, "excessive-exclamations"),
            Rule::Emoji => write!(f, "emoji"),
            Rule::SentenceFragments => write!(f, "sentence-fragments"),
        }
    }
}

/// Scoring result for a file on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path to the scored file
    pub file_path: PathBuf,
    /// SHA-256 of the scored content (hex)
    pub digest: String,
    #[serde(flatten)]
    pub result: DetectionResult,
}

/// What a generation provider hands back: bare text, or text with scores attached.
/// Only `content` is relied on; the provider's own scores are carried as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Generation {
    Plain(String),
    Scored {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        humanness: Option<f64>,
        #[serde(
            default,
            rename = "aiDetection",
            skip_serializing_if = "Option::is_none"
        )]
        ai_detection: Option<serde_json::Value>,
    },
}

impl Generation {
    /// The text to score, whichever shape the generation came in
    pub fn text(&self) -> &str {
        match self {
            Generation::Plain(text) => text,
            Generation::Scored { content, .. } => content,
        }
    }
}

static DEFAULT_ENGINE: Lazy<DetectionEngine> = Lazy::new(DetectionEngine::new);

/// Public API: score a block of text with the standard rule table.
///
/// Total over all inputs: never panics, never fails, same input same output.
pub fn score(content: &str) -> DetectionResult {
    DEFAULT_ENGINE.score(content)
}

/// Public API: score a file on disk. Used by the MCP server and other programmatic consumers.
///
/// * `path` - text file to score
/// * `work_dir` - directory to start the config search from
/// * `config_path` - optional path to .postcheckrc.json; if None, searches from work_dir
pub fn score_file(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<FileReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let engine = DetectionEngine::from_config(&config);
    engine.score_file(path, Some(&config))
}
