//! Drives one conversational turn end to end.
//!
//! Sanitize → crisis screen → boundary check → context → facts → prompt →
//! completion with bounded retries → normalize and validate, up to the
//! attempt budget → deterministic fallback. Nothing here returns an error
//! for transport or validation failures; the turn always produces text.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use uuid::Uuid;

use crate::config::CompletionConfig;
use crate::models::conversation::latest_user_text;
use crate::models::{TimeContext, Turn};
use crate::pipeline::completion::{CancelToken, CompletionClient, CompletionError, CompletionRequest};
use crate::pipeline::compose::{ComposeRequest, PromptComposer};
use crate::pipeline::context::{ContextAnalyzer, ConversationContext};
use crate::pipeline::fallback::{fallback, FallbackRequest};
use crate::pipeline::memory::{extract_facts, Facts};
use crate::pipeline::safety::boundary::{boundary_response, check_boundary};
use crate::pipeline::safety::output_sanitize::{contains_gibberish, sanitize_completion};
use crate::pipeline::safety::responses::crisis_response;
use crate::pipeline::safety::sanitize::sanitize_user_input;
use crate::pipeline::safety::{assess, CrisisAssessment};
use crate::pipeline::validate::{normalize, validate};
use crate::pipeline_config::{PipelineConfig, SamplingParams};
use crate::session::{InMemoryProfileStore, ProfileStore, SessionError, UserProfile};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Where the returned text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Safety,
    Boundary,
    Completion,
    Fallback,
}

/// One turn to answer. `history` ends with the user's message.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub history: &'a [Turn],
    pub user_name: Option<&'a str>,
    pub time: Option<&'a TimeContext>,
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> TurnRequest<'a> {
    pub fn new(history: &'a [Turn]) -> Self {
        Self {
            history,
            user_name: None,
            time: None,
            cancel: None,
        }
    }
}

/// Reply text plus the intermediate results, for observability.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub text: String,
    pub source: ResponseSource,
    pub assessment: CrisisAssessment,
    pub context: Option<ConversationContext>,
    pub facts: Option<Facts>,
}

// ═══════════════════════════════════════════════════════════
// Companion
// ═══════════════════════════════════════════════════════════

pub struct Companion<C: CompletionClient> {
    client: C,
    completion: CompletionConfig,
    config: PipelineConfig,
    store: Box<dyn ProfileStore + Send + Sync>,
    analyzer: ContextAnalyzer,
    composer: PromptComposer,
    rng: Mutex<StdRng>,
}

impl<C: CompletionClient> Companion<C> {
    pub fn new(client: C, completion: CompletionConfig) -> Self {
        Self {
            client,
            completion,
            config: PipelineConfig::default(),
            store: Box::new(InMemoryProfileStore::new()),
            analyzer: ContextAnalyzer::new(),
            composer: PromptComposer::new(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible randomized choices.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_pipeline_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, store: impl ProfileStore + Send + Sync + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Load the session profile, answer, save the profile.
    pub fn respond_for_session(
        &self,
        session_id: &Uuid,
        request: &TurnRequest<'_>,
    ) -> Result<TurnOutcome, SessionError> {
        let span = tracing::info_span!("respond", session = %session_id);
        let _guard = span.enter();

        let mut profile = self.store.load(session_id)?;
        let outcome = self.respond(request, &mut profile);
        self.store.save(session_id, &profile)?;
        Ok(outcome)
    }

    /// Answer one turn against a caller-held profile.
    pub fn respond(&self, request: &TurnRequest<'_>, profile: &mut UserProfile) -> TurnOutcome {
        let raw = latest_user_text(request.history);
        let text = match sanitize_user_input(raw, self.config.max_input_chars) {
            Ok(sanitized) => {
                if sanitized.was_modified {
                    tracing::debug!(
                        modifications = sanitized.modifications.len(),
                        "User input sanitized"
                    );
                }
                sanitized.text
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unusable user input");
                let context = ConversationContext::default();
                let assessment = CrisisAssessment::safe();
                let text = self.fallback_text(request, &context, &assessment, profile);
                return self.finish(text, ResponseSource::Fallback, assessment, Some(context), None);
            }
        };
        let history = with_latest_user_text(request.history, &text);

        // Safety first: an override skips everything else.
        let assessment = assess(&text, &history);
        if assessment.requires_override() {
            profile.mark_crisis();
            tracing::warn!(
                score = assessment.score,
                crisis_type = %assessment.primary_type,
                "Safety override"
            );
            let reply = crisis_response(assessment.primary_type).to_string();
            return self.finish(reply, ResponseSource::Safety, assessment, None, None);
        }

        if let Some(kind) = check_boundary(&text) {
            tracing::info!(boundary = ?kind, "Boundary redirect");
            let reply = boundary_response(kind).to_string();
            return self.finish(reply, ResponseSource::Boundary, assessment, None, None);
        }

        let context = self.analyzer.analyze(&text, &history, profile);
        let facts = extract_facts(&history);
        let composed = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let compose = ComposeRequest {
                context: &context,
                assessment: &assessment,
                history: &history,
                facts: &facts,
                user_name: request.user_name,
                time: request.time,
            };
            self.composer.compose(&compose, profile, &mut *rng)
        };
        let window_start = history.len().saturating_sub(self.config.history_window);
        let window = &history[window_start..];
        let deadline = Instant::now() + self.turn_budget();

        for attempt in 0..self.config.validation_attempts {
            let sampling = self.config.sampling_for(attempt);
            let raw = match self.complete_with_retry(
                &composed.system_prompt,
                window,
                sampling,
                deadline,
                request.cancel,
            ) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Completion unavailable");
                    break;
                }
            };

            let cleaned = sanitize_completion(&raw);
            if cleaned.is_empty() || contains_gibberish(&cleaned) {
                tracing::debug!(attempt, "Completion discarded as gibberish");
                continue;
            }
            let candidate = normalize(&cleaned, &context);
            match validate(&candidate, &context, &text) {
                Ok(()) => {
                    composed.profile_update.apply(profile);
                    return self.finish(
                        candidate,
                        ResponseSource::Completion,
                        assessment,
                        Some(context),
                        Some(facts),
                    );
                }
                Err(rejection) => {
                    tracing::debug!(attempt, rule = rejection.rule, "Validation failed");
                }
            }
        }

        let reply = match composed.memory_answer {
            Some(answer) => answer,
            None => self.fallback_text(
                &TurnRequest { history: &history, ..*request },
                &context,
                &assessment,
                profile,
            ),
        };
        self.finish(reply, ResponseSource::Fallback, assessment, Some(context), Some(facts))
    }

    // ── completion ──

    /// Wall-clock budget for all completion calls in one turn.
    fn turn_budget(&self) -> Duration {
        let attempts = self.config.validation_attempts.max(1) as u32;
        self.completion.timeout.saturating_mul(attempts)
    }

    /// One completion with transport retries. Each call gets the smaller of
    /// the configured timeout and what is left of the turn budget.
    fn complete_with_retry(
        &self,
        system_prompt: &str,
        history: &[Turn],
        sampling: SamplingParams,
        deadline: Instant,
        cancel: Option<&CancelToken>,
    ) -> Result<String, CompletionError> {
        let mut retries = 0;
        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(CompletionError::Cancelled);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(CompletionError::Timeout(self.completion.timeout.as_secs()));
            }

            let request = CompletionRequest {
                system_prompt,
                history,
                sampling,
                max_tokens: self.completion.max_tokens,
                timeout: remaining.min(self.completion.timeout),
            };
            match self.client.complete(&request) {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && retries < self.completion.max_retries => {
                    retries += 1;
                    tracing::warn!(retry = retries, error = %e, "Completion failed, retrying");
                    if !self.completion.retry_backoff.is_zero() {
                        std::thread::sleep(self.completion.retry_backoff);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    // ── helpers ──

    fn fallback_text(
        &self,
        request: &TurnRequest<'_>,
        context: &ConversationContext,
        assessment: &CrisisAssessment,
        profile: &mut UserProfile,
    ) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let fallback_request = FallbackRequest {
            context,
            assessment,
            history: request.history,
            user_name: request.user_name,
        };
        fallback(&fallback_request, profile, &mut *rng)
    }

    fn finish(
        &self,
        text: String,
        source: ResponseSource,
        assessment: CrisisAssessment,
        context: Option<ConversationContext>,
        facts: Option<Facts>,
    ) -> TurnOutcome {
        tracing::info!(outcome = ?source, score = assessment.score, "Turn complete");
        TurnOutcome {
            text,
            source,
            assessment,
            context,
            facts,
        }
    }
}

/// Copy of `history` with the latest user turn replaced by `text`.
fn with_latest_user_text(history: &[Turn], text: &str) -> Vec<Turn> {
    let mut turns = history.to_vec();
    if let Some(turn) = turns.iter_mut().rev().find(|t| t.is_user()) {
        turn.content = text.to_string();
    }
    turns
}
