//! Shared test doubles for engine tests.

use async_trait::async_trait;
use hearthline_core::analyzer::{SentimentAnalyzer, SentimentReport};
use hearthline_core::error::{AnalyzerError, ProviderError};
use hearthline_core::provider::{ChatMessage, ChatProvider, ChatRequest, ChatResponse};
use std::sync::Mutex;
use std::time::Duration;

/// A provider that returns a fixed reply and records every request.
pub struct RecordingProvider {
    reply: String,
    calls: Mutex<usize>,
    last: Mutex<Option<ChatRequest>>,
}

impl RecordingProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        *self.last.lock().unwrap() = Some(request);
        Ok(ChatResponse {
            message: ChatMessage::assistant(&self.reply),
            usage: None,
            model: "mock-model".into(),
        })
    }
}

/// A provider whose every call fails with a network error.
pub struct FailingProvider;

#[async_trait]
impl ChatProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// A provider that stalls before replying, for timeout tests.
pub struct SlowProvider {
    delay: Duration,
}

impl SlowProvider {
    pub fn taking(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ChatProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(ChatResponse {
            message: ChatMessage::assistant("too late"),
            usage: None,
            model: "mock-model".into(),
        })
    }
}

/// An analyzer returning a scripted report (or a scripted failure).
pub struct ScriptedAnalyzer {
    report: Option<SentimentReport>,
    calls: Mutex<usize>,
}

impl ScriptedAnalyzer {
    pub fn returning(report: SentimentReport) -> Self {
        Self {
            report: Some(report),
            calls: Mutex::new(0),
        }
    }

    pub fn neutral() -> Self {
        Self::returning(SentimentReport::neutral())
    }

    pub fn failing() -> Self {
        Self {
            report: None,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl SentimentAnalyzer for ScriptedAnalyzer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, _text: &str) -> Result<SentimentReport, AnalyzerError> {
        *self.calls.lock().unwrap() += 1;
        match &self.report {
            Some(report) => Ok(report.clone()),
            None => Err(AnalyzerError::AnalysisFailed("scripted failure".into())),
        }
    }
}
