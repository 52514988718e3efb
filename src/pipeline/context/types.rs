use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::{
    Contradiction, EmotionalTone, ImplicitRequest, MessageElement, TemporalScope, TopicType,
    UrgencyLevel,
};

/// Ceiling for `MessageElements::complexity_score`.
pub const MAX_COMPLEXITY: u8 = 10;

// ═══════════════════════════════════════════════════════════
// Message elements
// ═══════════════════════════════════════════════════════════

/// Orthogonal properties of a single user message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageElements {
    present: BTreeSet<MessageElement>,
    /// Name the user asked to be called, when `NameChange` is present.
    pub new_name: Option<String>,
    /// Sentences ending in "?".
    pub questions: Vec<String>,
    /// Clauses phrased as a request ("can you...", "please...").
    pub requests: Vec<String>,
}

impl MessageElements {
    pub fn insert(&mut self, element: MessageElement) {
        self.present.insert(element);
    }

    pub fn has(&self, element: MessageElement) -> bool {
        self.present.contains(&element)
    }

    pub fn count(&self) -> usize {
        self.present.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = MessageElement> + '_ {
        self.present.iter().copied()
    }

    /// Two points per active element, capped at 10.
    pub fn complexity_score(&self) -> u8 {
        let raw = self.present.len().saturating_mul(2);
        raw.min(usize::from(MAX_COMPLEXITY)) as u8
    }
}

/// How strongly a reply must address an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical = 1,
    Important = 2,
    Optional = 3,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

pub type ElementPriorities = BTreeMap<MessageElement, Priority>;

// ═══════════════════════════════════════════════════════════
// Task mode
// ═══════════════════════════════════════════════════════════

/// Explicit writing task that lifts the usual length ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskMode {
    Letter,
    List,
    Plan,
    Longer,
}

impl TaskMode {
    pub fn word_limit(&self) -> usize {
        match self {
            Self::Letter => 200,
            Self::List | Self::Plan => 150,
            Self::Longer => 180,
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Self::Letter => "Write in a warm, personal tone. Keep it heartfelt but not overly formal.",
            Self::List => "Use bullet points with clear, actionable items, one per line.",
            Self::Plan => "Give step-by-step guidance in chronological order.",
            Self::Longer => "The user asked for more detail. Expand, but stay conversational.",
        }
    }
}

// ═══════════════════════════════════════════════════════════
// ConversationContext
// ═══════════════════════════════════════════════════════════

/// Tags inferred for one user turn. Built fresh every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub temporal_scope: TemporalScope,
    pub emotional_tone: EmotionalTone,
    pub topic_type: TopicType,
    pub urgency_level: UrgencyLevel,
    /// 1 (surface) to 5 (deep vulnerability).
    pub disclosure_depth: u8,
    pub needs_validation: bool,
    pub key_entities: Vec<String>,
    pub implicit_requests: Vec<ImplicitRequest>,
    pub contradictions: Vec<Contradiction>,
    pub user_corrections: usize,
    pub is_post_crisis: bool,
    pub expressing_gratitude: bool,
    pub is_family_drama: bool,
    pub minimal_question_mode: bool,
    /// Count of user turns before this one.
    pub conversation_depth: usize,
    pub message_elements: MessageElements,
    pub element_priorities: ElementPriorities,
    pub task_mode: Option<TaskMode>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self {
            temporal_scope: TemporalScope::SingleEvent,
            emotional_tone: EmotionalTone::Neutral,
            topic_type: TopicType::General,
            urgency_level: UrgencyLevel::None,
            disclosure_depth: 1,
            needs_validation: false,
            key_entities: Vec::new(),
            implicit_requests: Vec::new(),
            contradictions: Vec::new(),
            user_corrections: 0,
            is_post_crisis: false,
            expressing_gratitude: false,
            is_family_drama: false,
            minimal_question_mode: true,
            conversation_depth: 0,
            message_elements: MessageElements::default(),
            element_priorities: ElementPriorities::new(),
            task_mode: None,
        }
    }
}

impl ConversationContext {
    pub fn has_request(&self, request: ImplicitRequest) -> bool {
        self.implicit_requests.contains(&request)
    }

    pub fn is_playful(&self) -> bool {
        self.topic_type == TopicType::PlayfulBanter
            || self.has_request(ImplicitRequest::MatchPlayfulEnergy)
    }

    /// Elements at a given priority, in element order.
    pub fn elements_at(&self, priority: Priority) -> Vec<MessageElement> {
        self.element_priorities
            .iter()
            .filter(|(_, p)| **p == priority)
            .map(|(e, _)| *e)
            .collect()
    }

    /// Feeling topic or a distressed tone other than crisis.
    pub fn is_emotional(&self) -> bool {
        self.topic_type == TopicType::Feeling
            || matches!(
                self.emotional_tone,
                EmotionalTone::Negative | EmotionalTone::Anxiety
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complexity_doubles_element_count() {
        let mut elements = MessageElements::default();
        assert_eq!(elements.complexity_score(), 0);
        elements.insert(MessageElement::Gratitude);
        elements.insert(MessageElement::Goodbye);
        assert_eq!(elements.complexity_score(), 4);
        elements.insert(MessageElement::Goodbye);
        assert_eq!(elements.count(), 2);
    }

    #[test]
    fn complexity_caps_at_ten() {
        let mut elements = MessageElements::default();
        for e in MessageElement::ALL {
            elements.insert(e);
        }
        assert_eq!(elements.count(), 10);
        assert_eq!(elements.complexity_score(), MAX_COMPLEXITY);
    }

    #[test]
    fn task_limits() {
        assert_eq!(TaskMode::Letter.word_limit(), 200);
        assert_eq!(TaskMode::List.word_limit(), 150);
        assert_eq!(TaskMode::Plan.word_limit(), 150);
        assert_eq!(TaskMode::Longer.word_limit(), 180);
    }

    #[test]
    fn elements_at_filters_by_priority() {
        let mut ctx = ConversationContext::default();
        ctx.element_priorities
            .insert(MessageElement::Gratitude, Priority::Critical);
        ctx.element_priorities
            .insert(MessageElement::Goodbye, Priority::Important);
        assert_eq!(ctx.elements_at(Priority::Critical), vec![MessageElement::Gratitude]);
        assert_eq!(Priority::Optional.rank(), 3);
    }

    #[test]
    fn default_context_is_quiet() {
        let ctx = ConversationContext::default();
        assert_eq!(ctx.disclosure_depth, 1);
        assert!(ctx.minimal_question_mode);
        assert!(!ctx.is_playful());
    }
}
