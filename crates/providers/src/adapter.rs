use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::mock::MockProvider;
use crate::types::*;
use duet_core::config::{AnswerProviderConfig, ConfigError};
use duet_core::{Error, Result};

/// Generic provider trait for answer backends
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Short name used in logs and `duet status`
    fn name(&self) -> &str;

    /// Send one request and wait for the complete answer
    async fn complete(&self, request: ChatRequest) -> Result<Answer>;
}

/// Run `provider.complete` under a deadline.
///
/// An elapsed deadline is reported as [`Error::Timeout`], which callers treat
/// like any other failure.
pub async fn complete_with_timeout(provider: &dyn Provider, request: ChatRequest, timeout: Duration) -> Result<Answer> {
    match tokio::time::timeout(timeout, provider.complete(request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(provider = provider.name(), timeout_secs = timeout.as_secs(), "answer request timed out");
            Err(Error::Timeout(timeout.as_secs()))
        }
    }
}

/// Perplexity-style chat completions provider (returns citations)
pub struct PerplexityProvider {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
}

impl PerplexityProvider {
    pub fn new(api_key: String, model: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Provider(format!("failed to build HTTP client: {}", e)))?;

        let base_url = base_url.unwrap_or_else(|| "https://api.perplexity.ai".to_string());
        Ok(Self { client, api_key, model, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Convert ChatRequest to the wire format
    fn to_wire_request(&self, request: &ChatRequest) -> WireRequest {
        WireRequest { model: self.model.clone(), messages: request.messages.clone(), temperature: request.temperature }
    }

    /// Extract the answer and its sources from a response body
    pub fn parse_response(body: &str) -> Result<Answer> {
        let response: WireResponse = serde_json::from_str(body)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Provider("response contained no choices".to_string()))?;

        let citations = match response.citations {
            Some(citations) => citations,
            None => response.search_results.unwrap_or_default().into_iter().filter_map(|r| r.url).collect(),
        };

        Ok(Answer { content, citations })
    }
}

#[async_trait::async_trait]
impl Provider for PerplexityProvider {
    fn name(&self) -> &str {
        "perplexity"
    }

    async fn complete(&self, request: ChatRequest) -> Result<Answer> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(ConfigError::MissingApiKey.to_string()));
        }

        let body = self.to_wire_request(&request);
        tracing::debug!(model = %self.model, messages = body.messages.len(), "sending answer request");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Provider(format!("API error: {} - {}", status, text)));
        }

        let answer = Self::parse_response(&text)?;
        tracing::debug!(citations = answer.citations.len(), "answer received");
        Ok(answer)
    }
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    citations: Option<Vec<String>>,
    #[serde(default)]
    search_results: Option<Vec<WireSearchResult>>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireSearchResult {
    #[serde(default)]
    url: Option<String>,
}

/// Provider factory for creating providers from config
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build the configured provider.
    ///
    /// A missing API key is not an error here: the Perplexity provider fails
    /// each request instead, so the rest of the app stays usable.
    pub fn create_from_config(config: &AnswerProviderConfig, timeout: Duration) -> Result<Arc<dyn Provider>> {
        match config {
            AnswerProviderConfig::Perplexity { api_key, model, base_url } => {
                if api_key.trim().is_empty() {
                    tracing::warn!("{}; answer requests will fail", ConfigError::MissingApiKey);
                }
                Ok(Arc::new(PerplexityProvider::new(
                    api_key.clone(),
                    model.clone(),
                    Some(base_url.clone()),
                    timeout,
                )?))
            }
            AnswerProviderConfig::Mock { responses_file } => {
                let provider = match responses_file {
                    Some(path) => MockProvider::from_file(Path::new(path))?,
                    None => MockProvider::new(),
                };
                Ok(Arc::new(provider))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts;

    fn provider() -> PerplexityProvider {
        PerplexityProvider::new("test-key".to_string(), "sonar".to_string(), None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_perplexity_provider_creation() {
        let provider = provider();
        assert_eq!(provider.api_key, "test-key");
        assert_eq!(provider.model(), "sonar");
        assert_eq!(provider.endpoint(), "https://api.perplexity.ai/chat/completions");
    }

    #[test]
    fn test_perplexity_provider_custom_url_trailing_slash() {
        let provider = PerplexityProvider::new(
            "k".to_string(),
            "sonar".to_string(),
            Some("http://localhost:8080/".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://localhost:8080/chat/completions");
    }

    #[test]
    fn test_wire_request_shape() {
        let request = prompts::build_request("sys", "Hello", 0.7);
        let json = serde_json::to_value(provider().to_wire_request(&request)).unwrap();

        assert_eq!(json["model"], "sonar");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Hello");
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_parse_response_with_citations() {
        let body = r#"{
            "id": "abc",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hi there"}}],
            "citations": ["https://example.com", "https://example.org"]
        }"#;

        let answer = PerplexityProvider::parse_response(body).unwrap();
        assert_eq!(answer.content, "Hi there");
        assert_eq!(answer.citations, vec!["https://example.com", "https://example.org"]);
    }

    #[test]
    fn test_parse_response_falls_back_to_search_results() {
        let body = r#"{
            "choices": [{"message": {"content": "Answer"}}],
            "search_results": [{"title": "A", "url": "https://a.example"}, {"title": "no url"}]
        }"#;

        let answer = PerplexityProvider::parse_response(body).unwrap();
        assert_eq!(answer.citations, vec!["https://a.example"]);
    }

    #[test]
    fn test_parse_response_without_sources() {
        let body = r#"{"choices": [{"message": {"content": "Plain"}}]}"#;
        let answer = PerplexityProvider::parse_response(body).unwrap();
        assert!(answer.citations.is_empty());
    }

    #[test]
    fn test_parse_response_no_choices_is_error() {
        let err = PerplexityProvider::parse_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[test]
    fn test_parse_response_malformed_is_error() {
        let err = PerplexityProvider::parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_per_request() {
        let config = AnswerProviderConfig::Perplexity {
            api_key: "  ".to_string(),
            model: "sonar".to_string(),
            base_url: "https://api.perplexity.ai".to_string(),
        };
        let provider = ProviderFactory::create_from_config(&config, Duration::from_secs(30)).unwrap();
        assert_eq!(provider.name(), "perplexity");

        let err = provider.complete(prompts::build_request("sys", "hi", 0.7)).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("missing API key"));
    }

    #[test]
    fn test_factory_creates_perplexity() {
        let config = AnswerProviderConfig::Perplexity {
            api_key: "pplx".to_string(),
            model: "sonar".to_string(),
            base_url: "https://api.perplexity.ai".to_string(),
        };
        let provider = ProviderFactory::create_from_config(&config, Duration::from_secs(30)).unwrap();
        assert_eq!(provider.name(), "perplexity");
    }

    #[test]
    fn test_factory_creates_mock() {
        let config = AnswerProviderConfig::Mock { responses_file: None };
        let provider = ProviderFactory::create_from_config(&config, Duration::from_secs(30)).unwrap();
        assert_eq!(provider.name(), "mock");
    }

    struct SlowProvider;

    #[async_trait::async_trait]
    impl Provider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _request: ChatRequest) -> Result<Answer> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Answer::new("too late"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_complete_with_timeout_elapses() {
        let request = prompts::build_request("sys", "hi", 0.7);
        let err = complete_with_timeout(&SlowProvider, request, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(2)));
    }

    #[tokio::test]
    async fn test_complete_with_timeout_passes_answer_through() {
        let request = prompts::build_request("sys", "hi", 0.7);
        let answer = complete_with_timeout(&MockProvider::new(), request, Duration::from_secs(2)).await.unwrap();
        assert!(!answer.content.is_empty());
    }
}
