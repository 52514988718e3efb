//! External completion endpoint.
//!
//! `CompletionClient` is the seam the orchestrator calls through. The HTTP
//! client speaks the OpenRouter chat-completions dialect; tests use the
//! scripted client.

pub mod types;
pub mod openrouter;
pub mod mock;

pub use mock::ScriptedCompletionClient;
pub use openrouter::OpenRouterClient;
pub use types::{CancelToken, CompletionRequest};

/// Errors from a single completion call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("Completion endpoint unreachable at {0}")]
    Connection(String),

    #[error("Completion request timed out after {0}s")]
    Timeout(u64),

    #[error("Completion endpoint returned error (status {status}): {body}")]
    Http { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Completion returned no content")]
    EmptyResponse,

    #[error("No API key configured (set OPENROUTER_KEY)")]
    MissingApiKey,

    #[error("Completion cancelled")]
    Cancelled,

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl CompletionError {
    /// Transport failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_)
                | Self::Timeout(_)
                | Self::Http { .. }
                | Self::ResponseParsing(_)
                | Self::EmptyResponse
        )
    }
}

/// Produces one reply for a system prompt and history.
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, CompletionError>;
}
