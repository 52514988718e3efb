//! Per-session conversational state.
//!
//! Crisis-decay counters, name-usage tracking and phrase rotation live on a
//! `UserProfile` owned by one chat session. The pipeline borrows the profile
//! mutably for a single turn; callers load it before the turn and save it
//! after, through a `ProfileStore`.
//!
//! Key properties:
//! - State is keyed by session id, never shared between sessions
//! - Nothing else survives a turn
//! - Profiles are serde-serializable so callers can persist them

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post-crisis turns before the recent-crisis flag clears.
pub const CRISIS_RECOVERY_TURNS: u32 = 3;

// ═══════════════════════════════════════════════════════════
// UserProfile: one session's counters
// ═══════════════════════════════════════════════════════════

/// When the user's name was last used in a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameUsage {
    /// conversation_depth of the last reply that used the name.
    pub last_turn: Option<usize>,
    pub count: u32,
}

impl NameUsage {
    pub fn record(&mut self, depth: usize) {
        self.last_turn = Some(depth);
        self.count += 1;
    }
}

/// Mutable per-session state threaded through each turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub recent_crisis: bool,
    pub crisis_recovery_turns: u32,
    pub name_usage: NameUsage,
    /// Name the user asked to be called during this session.
    pub preferred_name: Option<String>,
    /// Full professional-help disclaimer already shown once.
    pub disclaimer_shown: bool,
    /// Last two invitation groups used, newest last.
    pub recent_invitation_groups: Vec<usize>,
    /// Index of the last fallback empathy opener.
    pub last_empathy_opener: Option<usize>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// A crisis turn was detected: open the decay window.
    pub fn mark_crisis(&mut self) {
        self.recent_crisis = true;
        self.crisis_recovery_turns = 0;
    }

    /// Count one post-crisis turn; clears the flag once the window is spent.
    pub fn record_post_crisis_turn(&mut self) {
        self.crisis_recovery_turns += 1;
        if self.crisis_recovery_turns >= CRISIS_RECOVERY_TURNS {
            self.recent_crisis = false;
            self.crisis_recovery_turns = 0;
        }
    }

    /// Remember an invitation group, keeping only the last two.
    pub fn push_invitation_group(&mut self, group: usize) {
        self.recent_invitation_groups.push(group);
        let excess = self.recent_invitation_groups.len().saturating_sub(2);
        self.recent_invitation_groups.drain(..excess);
    }

    /// Caller-supplied name unless the user asked for another one.
    pub fn display_name<'a>(&'a self, supplied: Option<&'a str>) -> Option<&'a str> {
        self.preferred_name
            .as_deref()
            .or(supplied)
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

// ═══════════════════════════════════════════════════════════
// ProfileStore: explicit load/save by session id
// ═══════════════════════════════════════════════════════════

/// Storage seam for per-session profiles.
pub trait ProfileStore {
    /// Profile for a session; a fresh default when none is stored.
    fn load(&self, session_id: &Uuid) -> Result<UserProfile, SessionError>;
    fn save(&self, session_id: &Uuid, profile: &UserProfile) -> Result<(), SessionError>;
    fn evict(&self, session_id: &Uuid) -> Result<(), SessionError>;
}

/// Process-local store. Safe to share across request threads.
#[derive(Default)]
pub struct InMemoryProfileStore {
    sessions: Mutex<HashMap<Uuid, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with saved state.
    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self, session_id: &Uuid) -> Result<UserProfile, SessionError> {
        let sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    fn save(&self, session_id: &Uuid, profile: &UserProfile) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        sessions.insert(*session_id, profile.clone());
        Ok(())
    }

    fn evict(&self, session_id: &Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().map_err(|_| SessionError::Poisoned)?;
        sessions.remove(session_id);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Error type
// ═══════════════════════════════════════════════════════════

/// Errors from profile store operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Profile store lock poisoned")]
    Poisoned,
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
