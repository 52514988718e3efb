use crate::config::CompletionConfig;

use super::types::{ChatRequest, ChatResponse, CompletionRequest};
use super::{CompletionClient, CompletionError};

/// Blocking client for an OpenRouter-compatible chat completions endpoint.
pub struct OpenRouterClient {
    config: CompletionConfig,
    client: reqwest::blocking::Client,
}

impl OpenRouterClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CompletionError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self, CompletionError> {
        Self::new(CompletionConfig::from_env())
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }
}

impl CompletionClient for OpenRouterClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;
        let body = ChatRequest::build(&self.config.model, request);
        let timeout = request.timeout.min(self.config.timeout);

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(timeout.as_secs())
                } else if e.is_connect() {
                    CompletionError::Connection(self.config.base_url.clone())
                } else {
                    CompletionError::Client(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| CompletionError::ResponseParsing(e.to_string()))?;

        parsed
            .first_content()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyResponse)
    }
}
