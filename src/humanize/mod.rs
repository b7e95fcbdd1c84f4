//! Rewrite drafts so they read less like AI output
//!
//! The scorer never calls a model itself. A [`Rewriter`] takes the prompt
//! built by [`HumanizePrompt`] and hands back a rewrite, which is then scored
//! again so the caller sees the before/after difference.

pub mod apply;
pub mod claude;
pub mod command;
pub mod prompt;

pub use apply::{extract_rewrite, offer_apply};
pub use claude::{is_ai_available, ClaudeRewriter};
pub use command::{CommandRewriter, REWRITE_CMD_ENV};
pub use prompt::HumanizePrompt;

use crate::analyzer::DetectionEngine;
use crate::DetectionResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the post is going
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Linkedin,
    Threads,
    Instagram,
    Tiktok,
    #[default]
    Generic,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Threads,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Generic,
    ];

    /// Soft character limit for one post, if the platform has one
    pub fn char_limit(&self) -> Option<usize> {
        match self {
            Platform::Twitter => Some(280),
            Platform::Linkedin => Some(3000),
            Platform::Threads => Some(500),
            Platform::Instagram => Some(2200),
            Platform::Tiktok | Platform::Generic => None,
        }
    }

    /// How people actually write on this platform
    pub fn voice_hint(&self) -> &'static str {
        match self {
            Platform::Twitter => "Short and punchy. Lowercase is fine. One idea per post.",
            Platform::Linkedin => {
                "Professional but personal. Short paragraphs, a real story or lesson, \
                 no corporate filler."
            }
            Platform::Threads => "Conversational, like talking to friends. Loose and unpolished.",
            Platform::Instagram => {
                "Caption voice: casual, a little playful, emoji are fine where they fit."
            }
            Platform::Tiktok => {
                "Spoken script: how you'd say it to camera, with pauses and fragments."
            }
            Platform::Generic => "Natural, like a person typing quickly to people they know.",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Threads => "threads",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Generic => "generic",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        // "x" is what most people call twitter now
        if s == "x" {
            return Ok(Platform::Twitter);
        }
        Platform::ALL
            .into_iter()
            .find(|p| p.to_string() == s)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}

/// Voice to rewrite in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Casual,
    Professional,
    Witty,
    Bold,
}

impl Tone {
    pub fn hint(&self) -> &'static str {
        match self {
            Tone::Casual => "relaxed and friendly",
            Tone::Professional => "competent and clear, still clearly a person",
            Tone::Witty => "dry and a little funny, never forced",
            Tone::Bold => "direct and opinionated, short sentences",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tone::Casual => "casual",
            Tone::Professional => "professional",
            Tone::Witty => "witty",
            Tone::Bold => "bold",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "casual" => Ok(Tone::Casual),
            "professional" => Ok(Tone::Professional),
            "witty" => Ok(Tone::Witty),
            "bold" => Ok(Tone::Bold),
            other => Err(format!("unknown tone '{}'", other)),
        }
    }
}

/// Error from a rewrite backend
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("ANTHROPIC_API_KEY environment variable not set")]
    NoApiKey,
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Rate limited - try again later")]
    RateLimited,
    #[error("API error: {0}")]
    Api(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rewrite command failed: {0}")]
    Command(String),
    #[error("Rewrite command I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rewriter returned no text")]
    EmptyRewrite,
    #[error("AI feature not enabled. Rebuild with: cargo build --features ai")]
    FeatureDisabled,
}

/// Something that turns a rewrite prompt into rewritten text
pub trait Rewriter {
    fn rewrite(&self, prompt: &str) -> Result<String, RewriteError>;
}

/// Pick a rewriter from the environment: a configured command wins over the Claude API
pub fn rewriter_from_env() -> Option<Box<dyn Rewriter>> {
    if let Some(cmd) = CommandRewriter::from_env() {
        tracing::debug!("rewriting with {}", REWRITE_CMD_ENV);
        return Some(Box::new(cmd));
    }
    if is_ai_available() {
        if let Ok(client) = ClaudeRewriter::from_env() {
            tracing::debug!("rewriting with the Claude API");
            return Some(Box::new(client));
        }
    }
    None
}

/// Before/after comparison of one rewrite
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeReport {
    pub original: String,
    pub rewritten: String,
    pub before: DetectionResult,
    pub after: DetectionResult,
    /// Risk points removed by the rewrite; negative when the rewrite scored worse
    pub improvement: i16,
}

/// Score, rewrite, score again
pub fn humanize(
    engine: &DetectionEngine,
    content: &str,
    platform: Platform,
    tone: Tone,
    rewriter: &dyn Rewriter,
) -> Result<HumanizeReport, RewriteError> {
    let before = engine.score(content);
    let prompt = HumanizePrompt::build(content, platform, tone, &before);
    let raw = rewriter.rewrite(&prompt)?;
    let rewritten = extract_rewrite(&raw);
    if rewritten.trim().is_empty() {
        return Err(RewriteError::EmptyRewrite);
    }
    let after = engine.score(&rewritten);
    let improvement = before.risk_score as i16 - after.risk_score as i16;

    Ok(HumanizeReport {
        original: content.to_string(),
        rewritten,
        before,
        after,
        improvement,
    })
}
