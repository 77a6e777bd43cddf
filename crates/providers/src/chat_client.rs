//! OpenAI-compatible chat-completion client.
//!
//! Works with: LM Studio, OpenAI, vLLM, Ollama, and any endpoint exposing a
//! `/v1/chat/completions` route. Non-streaming only — the engine consumes
//! whole replies and wraps them as turns.

use async_trait::async_trait;
use hearthline_core::error::ProviderError;
use hearthline_core::provider::{ChatMessage, ChatProvider, ChatRequest, ChatResponse, Usage};
use hearthline_config::ProviderSettings;
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible LLM client.
///
/// This covers the vast majority of deployments since most local and hosted
/// inference servers expose the same chat-completions shape.
pub struct ChatCompletionsClient {
    name: String,
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Create a new client against an arbitrary base URL.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    /// Create a client for a local LM Studio endpoint (convenience constructor).
    pub fn lm_studio(base_url: Option<&str>) -> Self {
        Self::new(
            "lm_studio",
            base_url.unwrap_or("http://localhost:1234/v1"),
            None, // local servers don't need a key
        )
    }

    /// Create an OpenAI client (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", Some(api_key.into()))
    }

    /// Create a client from provider settings.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new("chat_completions", settings.base_url.clone(), settings.api_key.clone())
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }
}

#[async_trait]
impl ChatProvider for ChatCompletionsClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<ChatResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        });

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .authorized(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            message: ChatMessage {
                role: choice.message.role,
                content: choice.message.content.unwrap_or_default(),
            },
            usage,
            model: api_response.model,
        })
    }

    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let models = body["data"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m["id"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(models)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lm_studio_constructor() {
        let client = ChatCompletionsClient::lm_studio(None);
        assert_eq!(client.name(), "lm_studio");
        assert!(client.base_url.contains("localhost:1234"));
        assert!(client.api_key.is_none());
    }

    #[test]
    fn openai_constructor() {
        let client = ChatCompletionsClient::openai("sk-test");
        assert_eq!(client.name(), "openai");
        assert!(client.base_url.contains("api.openai.com"));
    }

    #[test]
    fn trailing_slash_trimmed() {
        let client = ChatCompletionsClient::new("test", "http://host:9999/v1/", None);
        assert_eq!(client.base_url, "http://host:9999/v1");
    }

    #[test]
    fn from_settings_carries_key() {
        let settings = ProviderSettings {
            base_url: "http://inference.internal/v1".into(),
            api_key: Some("key-123".into()),
        };
        let client = ChatCompletionsClient::from_settings(&settings);
        assert_eq!(client.base_url, "http://inference.internal/v1");
        assert_eq!(client.api_key.as_deref(), Some("key-123"));
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "alphamonarch-7b",
            "choices": [
                {"message": {"role": "assistant", "content": "Hello there!"}}
            ],
            "usage": {"prompt_tokens": 20, "completion_tokens": 4, "total_tokens": 24}
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.model, "alphamonarch-7b");
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("Hello there!")
        );
        assert_eq!(parsed.usage.as_ref().unwrap().total_tokens, 24);
    }

    #[test]
    fn parse_response_without_usage() {
        let data = r#"{
            "model": "m",
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.usage.is_none());
        assert!(parsed.choices[0].message.content.is_none());
    }
}
