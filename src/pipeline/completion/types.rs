//! Chat-completions wire types and the per-call request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{Role, Turn};
use crate::pipeline_config::SamplingParams;

// ──────────────────────────────────────────────
// Per-call request
// ──────────────────────────────────────────────

/// Everything one completion call needs.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system_prompt: &'a str,
    /// Turns forwarded after the system prompt, oldest first.
    pub history: &'a [Turn],
    pub sampling: SamplingParams,
    pub max_tokens: u32,
    /// Upper bound for this HTTP call.
    pub timeout: Duration,
}

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ──────────────────────────────────────────────
// Wire types (OpenAI-compatible chat completions)
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Request body for POST /chat/completions.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
}

impl<'a> ChatRequest<'a> {
    /// System prompt first, then the forwarded turns. System turns from the
    /// history are dropped.
    pub fn build(model: &'a str, request: &CompletionRequest<'_>) -> Self {
        let mut messages = Vec::with_capacity(request.history.len() + 1);
        messages.push(ChatMessage {
            role: Role::System,
            content: request.system_prompt.to_string(),
        });
        messages.extend(
            request
                .history
                .iter()
                .filter(|t| t.role != Role::System)
                .map(|t| ChatMessage {
                    role: t.role,
                    content: t.content.clone(),
                }),
        );
        let sampling = request.sampling;
        Self {
            model,
            messages,
            temperature: sampling.temperature,
            max_tokens: request.max_tokens,
            top_p: sampling.top_p,
            frequency_penalty: Some(sampling.frequency_penalty),
            presence_penalty: Some(sampling.presence_penalty),
        }
    }
}

/// Response body from POST /chat/completions.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, trimmed. None when absent or blank.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(history: &'a [Turn]) -> CompletionRequest<'a> {
        CompletionRequest {
            system_prompt: "be kind",
            history,
            sampling: SamplingParams {
                temperature: 0.8,
                top_p: 0.9,
                frequency_penalty: 0.5,
                presence_penalty: 0.4,
            },
            max_tokens: 600,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn payload_starts_with_system_prompt() {
        let history = vec![
            Turn::system("stale"),
            Turn::user("hi"),
            Turn::assistant("Hey there."),
        ];
        let body = ChatRequest::build("test/model", &request(&history));
        let json = serde_json::to_value(&body).unwrap();
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "be kind");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(json["model"], "test/model");
        assert_eq!(json["max_tokens"], 600);
        assert!(json.get("presence_penalty").is_some());
    }

    #[test]
    fn first_content_skips_blank() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert_eq!(parsed.first_content(), None);
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":" Hey. "}}]}"#).unwrap();
        assert_eq!(parsed.first_content(), Some("Hey."));
        let parsed: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_content(), None);
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
