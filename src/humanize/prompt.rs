//! Rewrite prompt builder

use super::{Platform, Tone};
use crate::{DetectionResult, Rule};

/// Builds the instructions a rewriter gets for one draft
pub struct HumanizePrompt;

impl HumanizePrompt {
    pub fn build(
        content: &str,
        platform: Platform,
        tone: Tone,
        result: &DetectionResult,
    ) -> String {
        let flags = Self::format_flags(result);
        let length = match platform.char_limit() {
            Some(limit) => format!("Stay under {} characters.", limit),
            None => "Keep roughly the same length.".to_string(),
        };

        format!(
            r#"Rewrite this {platform} draft so it sounds like a real person wrote it.

## Current AI-detection risk
{score}/100 ({level})

## What gives it away
{flags}
## Voice
- Platform: {voice}
- Tone: {tone_hint}
- {length}

## Rules for the rewrite
{rules}
## Draft
```
{content}
```

Reply with only the rewritten post inside a single ``` block. No commentary."#,
            platform = platform,
            score = result.risk_score,
            level = result.risk_level,
            flags = flags,
            voice = platform.voice_hint(),
            tone_hint = tone.hint(),
            length = length,
            rules = Self::format_rules(result),
            content = content.trim(),
        )
    }

    fn format_flags(result: &DetectionResult) -> String {
        let ai_flags: Vec<&String> = result
            .flags
            .iter()
            .filter(|f| !f.ends_with("(human signal)"))
            .collect();
        if ai_flags.is_empty() {
            return "- Nothing specific. Loosen it up anyway.\n".to_string();
        }
        ai_flags.iter().map(|f| format!("- {}\n", f)).collect()
    }

    /// Fix instructions for the rules that fired, then the standing ones
    fn format_rules(result: &DetectionResult) -> String {
        let mut out: String = result
            .recommendations
            .iter()
            .map(|r| format!("- {}\n", r))
            .collect();
        out.push_str("- Keep the facts and the point of the post. Don't invent details.\n");
        if !result.metrics.has_contractions {
            out.push_str("- Use contractions (it's, don't, I'm).\n");
        }
        if result.metrics.has_emoji {
            out.push_str("- Keep the emoji that are already there.\n");
        }
        out.push_str(&format!(
            "- Avoid these words entirely: {}.\n",
            Self::banned_words_hint()
        ));
        out
    }

    fn banned_words_hint() -> String {
        crate::analyzer::rules::buzzwords::DEFAULT_BUZZWORDS
            .iter()
            .take(8)
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Rule ids that fired, for callers that want structure instead of prose
    pub fn triggered_rules(result: &DetectionResult) -> Vec<Rule> {
        let mut rules: Vec<Rule> = result
            .breakdown
            .iter()
            .flatten()
            .map(|c| c.rule)
            .collect();
        rules.dedup();
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::DetectionEngine;

    #[test]
    fn test_prompt_lists_flags_and_draft() {
        let result = crate::score("delve into it; really");
        let prompt = HumanizePrompt::build(
            "delve into it; really",
            Platform::Twitter,
            Tone::Witty,
            &result,
        );
        assert!(prompt.contains("twitter draft"));
        assert!(prompt.contains("25/100 (LOW)"));
        assert!(prompt.contains("- AI buzzword detected: \"delve\""), "got: {}", prompt);
        assert!(prompt.contains("Stay under 280 characters."));
        assert!(prompt.contains("dry and a little funny"));
        assert!(prompt.contains("```\ndelve into it; really\n```"));
    }

    #[test]
    fn test_prompt_skips_human_signals() {
        let result = crate::score("lol 🚀");
        let prompt = HumanizePrompt::build("lol 🚀", Platform::Generic, Tone::Casual, &result);
        assert!(!prompt.contains("human signal"));
        assert!(prompt.contains("Nothing specific"));
        assert!(prompt.contains("Keep the emoji"));
        assert!(prompt.contains("Keep roughly the same length."));
    }

    #[test]
    fn test_prompt_includes_recommendations() {
        let result = crate::score("delve");
        let prompt =
            HumanizePrompt::build("delve", Platform::Linkedin, Tone::Professional, &result);
        for rec in &result.recommendations {
            assert!(prompt.contains(rec.as_str()));
        }
    }

    #[test]
    fn test_triggered_rules_from_breakdown() {
        let engine = DetectionEngine::new().with_breakdown();
        let result = engine.score("delve delve; leverage");
        assert_eq!(
            HumanizePrompt::triggered_rules(&result),
            vec![Rule::AiBuzzword, Rule::ComplexPunctuation]
        );
        assert!(HumanizePrompt::triggered_rules(&crate::score("delve")).is_empty());
    }
}
