//! Model provider configuration from TOML (`[provider]` section)
//!
//! All council members and the chairman are reached through one
//! OpenAI-compatible chat completions endpoint (OpenRouter by default).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Environment variable name for the API key (default: "OPENROUTER_API_KEY").
    pub api_key_env: String,
    /// Max tokens per completion
    pub max_tokens: u32,
    /// Sent as `HTTP-Referer`
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            max_tokens: 2000,
            referer: "https://mindlyhealth.io".to_string(),
            title: "Mindly Chairman's Council".to_string(),
        }
    }
}

impl FileProviderConfig {
    /// The configured key, falling back to the environment. Blank values count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }

    /// Copy with the direct key masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}
