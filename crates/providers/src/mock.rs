use crate::Provider;
use crate::types::*;
use duet_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted response for offline runs and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MockResponse {
    Text {
        content: String,
        #[serde(default)]
        citations: Vec<String>,
        /// Simulated latency before answering
        #[serde(default)]
        delay_ms: Option<u64>,
    },
    Error {
        message: String,
    },
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into(), citations: Vec::new(), delay_ms: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

/// Mock configuration from TOML file
#[derive(Debug, Deserialize)]
struct MockScript {
    responses: Vec<MockResponse>,
}

/// Mock provider serving scripted responses in order
pub struct MockProvider {
    responses: Vec<MockResponse>,
    current: AtomicUsize,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::from_responses(vec![MockResponse::text("Mock response - configure responses_file in config")])
    }

    pub fn from_responses(responses: Vec<MockResponse>) -> Self {
        Self { responses, current: AtomicUsize::new(0) }
    }

    /// Load a `[[responses]]` script
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read mock responses {}: {}", path.display(), e)))?;
        let script: MockScript = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), responses = script.responses.len(), "loaded mock script");
        Ok(Self::from_responses(script.responses))
    }

    /// Number of requests served so far
    pub fn served(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> MockResponse {
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        self.responses.get(index).cloned().unwrap_or_else(|| {
            MockResponse::text(format!(
                "No more mock responses configured (requested: {}, available: {})",
                index + 1,
                self.responses.len()
            ))
        })
    }
}

#[async_trait::async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: ChatRequest) -> Result<Answer> {
        tracing::debug!(question = ?request.last_user_text().map(|q| duet_core::logging::redact(q, 40)), "mock request");

        match self.next_response() {
            MockResponse::Text { content, citations, delay_ms } => {
                if let Some(ms) = delay_ms {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                }
                Ok(Answer { content, citations })
            }
            MockResponse::Error { message } => Err(Error::Provider(message)),
        }
    }
}
