use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::types::CompletionRequest;
use super::{CompletionClient, CompletionError};

/// Test client that replays a script of results, then repeats the last one.
pub struct ScriptedCompletionClient {
    script: Vec<Result<String, CompletionError>>,
    call_count: AtomicUsize,
    last_system_prompt: Mutex<Option<String>>,
}

impl ScriptedCompletionClient {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script,
            call_count: AtomicUsize::new(0),
            last_system_prompt: Mutex::new(None),
        }
    }

    /// Always answers with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// System prompt of the most recent call.
    pub fn last_system_prompt(&self) -> Option<String> {
        self.last_system_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl CompletionClient for ScriptedCompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, CompletionError> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompt) = self.last_system_prompt.lock() {
            *prompt = Some(request.system_prompt.to_string());
        }
        self.script
            .get(index)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or(Err(CompletionError::EmptyResponse))
    }
}
