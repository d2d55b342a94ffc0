//! Caption Rewriter - brand-voice adaptation with hard platform limits
//!
//! Rewriting is an enhancement, never a hard dependency: any backend failure
//! returns the original caption unchanged.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const MAX_TOKENS: u32 = 1024;

const DEFAULT_CHAR_LIMIT: usize = 2200;

const SYSTEM_INSTRUCTION: &str = "You are a social media content writer for real estate agents. \
Rewrite the given caption to sound like it was written by the agent personally, incorporating \
their name and brand voice. Keep the same message and call-to-action but make it feel authentic \
and personal. Stay within the platform's character limit. Return ONLY the rewritten caption \
text, no explanation.";

/// Per-platform caption ceilings. Unknown platforms get the instagram limit.
pub fn platform_char_limit(platform: &str) -> usize {
    match platform {
        "twitter" => 280,
        "instagram" => 2200,
        "facebook" => 63206,
        "linkedin" => 3000,
        _ => DEFAULT_CHAR_LIMIT,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("backend transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("backend returned no usable text")]
    EmptyOutput,

    #[error("configuration: {0}")]
    Config(String),
}

/// Generative text seam. The rewriter's limit lookup, truncation, and
/// fallback logic are testable against any substitute.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, RewriteError>;
}

/// Anthropic messages API backend.
pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicGenerator {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, RewriteError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| RewriteError::Config("ANTHROPIC_API_KEY not set".to_string()))?;
        Ok(Self::new(&api_key))
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, RewriteError> {
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RewriteError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        let text = payload["content"][0]["text"]
            .as_str()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(RewriteError::EmptyOutput)?;
        Ok(text.to_string())
    }
}

pub struct CaptionRewriter {
    generator: Arc<dyn TextGenerator>,
}

impl CaptionRewriter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Rewrite a caption in the subscriber's voice, hard-capped at the
    /// platform limit. Falls back to the original caption on any backend
    /// failure.
    pub async fn rewrite(&self, caption: &str, profile: &VoiceProfile, platform: &str) -> String {
        let limit = platform_char_limit(platform);
        let prompt = build_prompt(caption, profile, platform, limit);

        match self.generator.generate(SYSTEM_INSTRUCTION, &prompt).await {
            Ok(text) => truncate_chars(text.trim(), limit),
            Err(err) => {
                warn!(platform, error = %err, "caption rewrite failed, returning original");
                caption.to_string()
            }
        }
    }
}

fn build_prompt(caption: &str, profile: &VoiceProfile, platform: &str, limit: usize) -> String {
    format!(
        "Rewrite this caption for {platform} (max {limit} characters):\n\n\
         Original caption: {caption}\n\n\
         Agent name: {name}\n\
         Company: {company}\n\
         Tagline: {tagline}\n\
         Platform: {platform}",
        name = profile.name,
        company = profile.company.as_deref().unwrap_or(""),
        tagline = profile.tagline.as_deref().unwrap_or(""),
    )
}

/// The backend is not trusted to respect the limit exactly. The cut is by
/// character count; mid-word cuts are possible (matches upstream behavior).
fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
