//! Claude API rewriter
//!
//! Requires the `ai` feature to be enabled:
//! ```toml
//! postcheck = { version = "0.4", features = ["ai"] }
//! ```

use super::{RewriteError, Rewriter};

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// Posts are short; a rewrite never needs the full output budget
#[cfg(feature = "ai")]
const MAX_TOKENS: u32 = 1024;

/// Rewrites drafts through the Anthropic Messages API
#[cfg_attr(not(feature = "ai"), allow(dead_code))]
pub struct ClaudeRewriter {
    api_key: String,
    model: String,
    base_url: String,
}

impl ClaudeRewriter {
    /// Create a rewriter using ANTHROPIC_API_KEY from the environment
    pub fn from_env() -> Result<Self, RewriteError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| RewriteError::NoApiKey)?;
        if api_key.trim().is_empty() {
            return Err(RewriteError::NoApiKey);
        }
        Ok(Self::with_key(api_key))
    }

    pub fn with_key(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: MESSAGES_URL.to_string(),
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    #[cfg(feature = "ai")]
    fn send_request(&self, prompt: &str) -> Result<String, RewriteError> {
        use serde_json::json;

        let client = reqwest::blocking::Client::new();
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let response = client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .map_err(|e| RewriteError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RewriteError::RateLimited);
        }
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(RewriteError::Api(format!("{}: {}", status, error_text)));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| RewriteError::InvalidResponse(e.to_string()))?;

        if let Some(tokens) = json["usage"]["output_tokens"].as_u64() {
            tracing::debug!("rewrite used {} output tokens", tokens);
        }

        json["content"]
            .as_array()
            .and_then(|arr| arr.first())
            .and_then(|item| item["text"].as_str())
            .map(str::to_string)
            .ok_or_else(|| RewriteError::InvalidResponse("No content in response".to_string()))
    }

    #[cfg(not(feature = "ai"))]
    fn send_request(&self, _prompt: &str) -> Result<String, RewriteError> {
        Err(RewriteError::FeatureDisabled)
    }
}

impl Rewriter for ClaudeRewriter {
    fn rewrite(&self, prompt: &str) -> Result<String, RewriteError> {
        self.send_request(prompt)
    }
}

/// Check if the AI feature is available
pub fn is_ai_available() -> bool {
    cfg!(feature = "ai")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_key_uses_default_model() {
        let client = ClaudeRewriter::with_key("k".to_string());
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        let client = client.model("claude-3-5-haiku-latest");
        assert_eq!(client.model_name(), "claude-3-5-haiku-latest");
    }

    #[cfg(not(feature = "ai"))]
    #[test]
    fn test_rewrite_without_feature_is_disabled() {
        let client = ClaudeRewriter::with_key("k".to_string());
        assert!(matches!(
            client.rewrite("anything"),
            Err(RewriteError::FeatureDisabled)
        ));
        assert!(!is_ai_available());
    }
}
