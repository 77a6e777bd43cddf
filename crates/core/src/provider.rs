//! ChatProvider trait — the abstraction over the external LLM service.
//!
//! A provider knows how to send a prepared message list to a chat-completion
//! endpoint and return the generated reply. The orchestrator calls
//! `complete()` without knowing which backend is configured, and treats every
//! failure as recoverable (it degrades rather than propagates).

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single message in the wire-level conversation sent to the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user", or "assistant"
    pub role: String,

    /// The text content
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".into(), content: content.into() }
    }
}

/// Parameters for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g. a local GGUF path or a hosted model id)
    pub model: String,

    /// The ordered message list (system prompt first)
    pub messages: Vec<ChatMessage>,

    /// Temperature (0.0 = deterministic, higher = more varied)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A completed response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated reply (role is normally "assistant")
    pub message: ChatMessage,

    /// Token usage statistics, when the backend reports them
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core ChatProvider trait.
///
/// Implementations: OpenAI-compatible endpoints (LM Studio, OpenAI, vLLM)
/// and scripted mocks in tests. The orchestrator owns timeout enforcement,
/// so implementations only need to surface transport and status failures.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// A human-readable name for this provider (e.g. "lm_studio").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ChatRequest) -> std::result::Result<ChatResponse, ProviderError>;

    /// List available models for this provider.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }

    /// Health check — can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
