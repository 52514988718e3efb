use crate::models::conversation::{latest_assistant_text, prior_user_turns};
use crate::models::{EmotionalTone, ImplicitRequest, TopicType, Turn};
use crate::pipeline::safety::frames::is_family_drama;
use crate::session::UserProfile;

use super::elements::{element_priorities, extract_elements};
use super::requests::{
    contradictions, count_corrections, identity_questions, implicit_requests, key_entities,
    should_offer_guidance, task_mode,
};
use super::taggers::{disclosure_depth, emotional_tone, temporal_scope, topic_type, urgency};
use super::types::ConversationContext;

/// Runs every tagger over one user turn.
///
/// The analyzer itself is stateless. Session state (crisis decay, the
/// preferred name) lives on the `UserProfile` passed in for the turn.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextAnalyzer;

impl ContextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// `history` ends with the current user turn (`text`).
    pub fn analyze(
        &self,
        text: &str,
        history: &[Turn],
        profile: &mut UserProfile,
    ) -> ConversationContext {
        let conversation_depth = prior_user_turns(history);
        let last_bot = latest_assistant_text(history);

        let temporal_scope = temporal_scope(text);
        let emotional_tone = emotional_tone(text, profile);
        let topic_type = topic_type(text, conversation_depth, last_bot);
        let urgency_level = urgency(emotional_tone, text);
        let disclosure_depth = disclosure_depth(text);

        let needs_validation = matches!(
            emotional_tone,
            EmotionalTone::Negative | EmotionalTone::Crisis | EmotionalTone::Anxiety
        ) || matches!(topic_type, TopicType::Achievement | TopicType::Gratitude);

        let mut implicit = implicit_requests(text, emotional_tone, topic_type, last_bot);
        if should_offer_guidance(conversation_depth, disclosure_depth, text) {
            implicit.push(ImplicitRequest::GuidanceNeeded);
        }
        implicit.extend(identity_questions(text));

        let is_post_crisis = emotional_tone == EmotionalTone::PostCrisis;
        if is_post_crisis {
            profile.record_post_crisis_turn();
        }

        let message_elements = extract_elements(text);
        if let Some(name) = &message_elements.new_name {
            tracing::debug!("Preferred name updated from message");
            profile.preferred_name = Some(name.clone());
        }
        let element_priorities =
            element_priorities(&message_elements, emotional_tone, disclosure_depth);

        let is_family_drama = is_family_drama(text);

        let context = ConversationContext {
            temporal_scope,
            emotional_tone,
            topic_type,
            urgency_level,
            disclosure_depth,
            needs_validation,
            key_entities: key_entities(text),
            implicit_requests: implicit,
            contradictions: contradictions(history),
            user_corrections: count_corrections(history),
            is_post_crisis,
            expressing_gratitude: topic_type == TopicType::Gratitude,
            is_family_drama,
            minimal_question_mode: !(is_family_drama || disclosure_depth >= 4),
            conversation_depth,
            message_elements,
            element_priorities,
            task_mode: task_mode(text),
        };

        tracing::debug!(
            tone = %context.emotional_tone,
            topic = %context.topic_type,
            urgency = %context.urgency_level,
            disclosure = context.disclosure_depth,
            depth = context.conversation_depth,
            complexity = context.message_elements.complexity_score(),
            "Context analyzed"
        );

        context
    }
}
