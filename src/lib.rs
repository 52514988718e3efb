pub mod config;
pub mod pipeline_config;
pub mod models;
pub mod session;
pub mod pipeline;

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::CompletionConfig;
use crate::models::{TimeContext, Turn};
use crate::pipeline::completion::{CompletionError, OpenRouterClient};
use crate::pipeline::{Companion, TurnOutcome, TurnRequest};
use crate::session::SessionError;

// ═══════════════════════════════════════════════════════════
// CLI request / response
// ═══════════════════════════════════════════════════════════

/// One turn read from stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct CliRequest {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub turns: Vec<Turn>,
    /// Local clock when omitted.
    #[serde(default)]
    pub time_context: Option<TimeContext>,
}

#[derive(Debug, Serialize)]
pub struct CliResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: TurnOutcome,
}

/// Binary-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read stdin: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Completion client error: {0}")]
    Completion(#[from] CompletionError),
    #[error("Session store error: {0}")]
    Session(#[from] SessionError),
    #[error("Request has no user turn")]
    NoUserTurn,
}

/// Answer one JSON request.
pub fn handle_request<C: pipeline::completion::CompletionClient>(
    companion: &Companion<C>,
    request: &CliRequest,
) -> Result<CliResponse, AppError> {
    if !request.turns.iter().any(Turn::is_user) {
        return Err(AppError::NoUserTurn);
    }
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    let time = request
        .time_context
        .clone()
        .unwrap_or_else(|| TimeContext::from_datetime(&chrono::Local::now()));
    let turn = TurnRequest {
        history: &request.turns,
        user_name: request.user_name.as_deref(),
        time: Some(&time),
        cancel: None,
    };
    let outcome = companion.respond_for_session(&session_id, &turn)?;
    Ok(CliResponse {
        session_id,
        outcome,
    })
}

pub fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request: CliRequest = serde_json::from_str(&input)?;

    let completion = CompletionConfig::from_env();
    if completion.api_key.is_none() {
        tracing::warn!("OPENROUTER_KEY not set, replies will use fallbacks");
    }
    let client = OpenRouterClient::new(completion.clone())?;
    let companion = Companion::new(client, completion);

    let response = handle_request(&companion, &request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::completion::ScriptedCompletionClient;
    use crate::pipeline::ResponseSource;

    fn companion() -> Companion<ScriptedCompletionClient> {
        Companion::new(
            ScriptedCompletionClient::new(vec![Err(CompletionError::MissingApiKey)]),
            CompletionConfig::default(),
        )
        .with_seed(1)
    }

    #[test]
    fn parses_minimal_request() {
        let request: CliRequest =
            serde_json::from_str(r#"{"turns":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(request.session_id.is_none());
        assert_eq!(request.turns, vec![Turn::user("hi")]);
    }

    #[test]
    fn request_without_user_turn_is_rejected() {
        let request: CliRequest =
            serde_json::from_str(r#"{"turns":[{"role":"assistant","content":"hi"}]}"#).unwrap();
        assert!(matches!(handle_request(&companion(), &request), Err(AppError::NoUserTurn)));
    }

    #[test]
    fn response_carries_session_and_source() {
        let id = Uuid::new_v4();
        let request = CliRequest {
            session_id: Some(id),
            user_name: Some("Sam".into()),
            turns: vec![Turn::user("I want to kill myself")],
            time_context: None,
        };
        let response = handle_request(&companion(), &request).unwrap();
        assert_eq!(response.session_id, id);
        assert_eq!(response.outcome.source, ResponseSource::Safety);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["source"], "safety");
        assert!(json["text"].as_str().unwrap().contains("988"));
    }
}
