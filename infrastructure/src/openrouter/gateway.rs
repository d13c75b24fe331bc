//! [`ModelBackend`] over an OpenAI-compatible chat completions endpoint.

use super::protocol::{ChatRequest, ChatResponse, Message};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use council_application::{CallError, ModelBackend};
use council_domain::{ModelId, truncate};
use std::time::Duration;
use tracing::debug;

/// Connection settings for the provider
#[derive(Clone)]
pub struct OpenRouterSettings {
    pub base_url: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub referer: String,
    pub title: String,
}

impl OpenRouterSettings {
    /// Settings from `[provider]`; `None` when no API key resolves
    pub fn from_config(config: &FileProviderConfig) -> Option<Self> {
        Some(Self {
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key()?,
            max_tokens: config.max_tokens,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let defaults = FileProviderConfig::default();
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_tokens: defaults.max_tokens,
            referer: defaults.referer,
            title: defaults.title,
        }
    }
}

impl std::fmt::Debug for OpenRouterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Chat completions backend
pub struct OpenRouterBackend {
    client: reqwest::Client,
    endpoint: String,
    settings: OpenRouterSettings,
}

impl OpenRouterBackend {
    pub fn new(settings: OpenRouterSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("chairman-council/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            settings,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ModelBackend for OpenRouterBackend {
    async fn call(
        &self,
        model: &ModelId,
        system_prompt: &str,
        user_message: &str,
        timeout: Duration,
    ) -> Result<String, CallError> {
        let request = ChatRequest {
            model: model.as_str(),
            messages: vec![Message::system(system_prompt), Message::user(user_message)],
            max_tokens: self.settings.max_tokens,
        };

        debug!(model = %model, endpoint = %self.endpoint, "Sending chat completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.settings.api_key)
            .header("HTTP-Referer", &self.settings.referer)
            .header("X-Title", &self.settings.title)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(e, timeout))?;

        if !status.is_success() {
            return Err(CallError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| CallError::MalformedBody {
                detail: e.to_string(),
                body: truncate(&body, 500),
            })?;

        if let Some(error) = &parsed.error
            && parsed.choices.is_empty()
        {
            return Err(CallError::MalformedBody {
                detail: format!("provider error: {}", error.message),
                body: truncate(&body, 500),
            });
        }

        parsed
            .first_content()
            .ok_or_else(|| CallError::MalformedBody {
                detail: "missing choices[0].message.content".to_string(),
                body: truncate(&body, 500),
            })
    }
}

fn map_transport_error(e: reqwest::Error, timeout: Duration) -> CallError {
    if e.is_timeout() {
        CallError::Timeout(timeout)
    } else {
        CallError::Connection(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> OpenRouterBackend {
        OpenRouterBackend::new(OpenRouterSettings::new(server.uri(), "sk-or-test")).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "gen-123",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn test_call_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-or-test"))
            .and(header("http-referer", "https://mindlyhealth.io"))
            .and(header("x-title", "Mindly Chairman's Council"))
            .and(body_partial_json(serde_json::json!({
                "model": "anthropic/claude-3-opus",
                "max_tokens": 2000,
                "messages": [
                    {"role": "system", "content": "You are a clinician."},
                    {"role": "user", "content": "patient reports insomnia"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Consider CBT-I.")))
            .expect(1)
            .mount(&server)
            .await;

        let text = backend(&server)
            .call(
                &ModelId::new("anthropic/claude-3-opus"),
                "You are a clinician.",
                "patient reports insomnia",
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(text, "Consider CBT-I.");
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = backend(&server)
            .call(&ModelId::new("x/y"), "s", "u", Duration::from_secs(5))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CallError::Status {
                status: 500,
                body: "upstream exploded".to_string()
            }
        );
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_missing_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let err = backend(&server)
            .call(&ModelId::new("x/y"), "s", "u", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::MalformedBody { .. }));
    }

    #[tokio::test]
    async fn test_error_in_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": {"message": "model not found", "code": 404}
            })))
            .mount(&server)
            .await;

        let err = backend(&server)
            .call(&ModelId::new("x/y"), "s", "u", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model not found"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = backend(&server)
            .call(&ModelId::new("x/y"), "s", "u", Duration::from_secs(5))
            .await
            .unwrap_err();
        match err {
            CallError::MalformedBody { body, .. } => assert!(body.contains("gateway")),
            other => panic!("expected MalformedBody, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = backend(&server)
            .call(&ModelId::new("x/y"), "s", "u", Duration::from_millis(200))
            .await
            .unwrap_err();
        assert_eq!(err, CallError::Timeout(Duration::from_millis(200)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let settings = OpenRouterSettings::new("http://127.0.0.1:9", "k");
        let err = OpenRouterBackend::new(settings)
            .unwrap()
            .call(&ModelId::new("x/y"), "s", "u", Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Connection(_)));
    }

    #[test]
    fn test_endpoint_and_redacted_debug() {
        let settings = OpenRouterSettings::new("https://openrouter.ai/api/v1/", "sk-or-secret");
        assert!(!format!("{settings:?}").contains("sk-or-secret"));
        let backend = OpenRouterBackend::new(settings).unwrap();
        assert_eq!(backend.endpoint(), "https://openrouter.ai/api/v1/chat/completions");
    }
}
