//! Multi-label extraction: key entities, implicit requests, identity
//! questions, corrections, contradictions and task mode.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::models::conversation::{user_texts, word_count};
use crate::models::{Contradiction, EmotionalTone, ImplicitRequest, MessageElement, TopicType, Turn};
use crate::pipeline::patterns::{compile, phrase_set, tagged, PatternTable};

use super::types::{ConversationContext, TaskMode};

// ═══════════════════════════════════════════════════════════
// Key entities
// ═══════════════════════════════════════════════════════════

static PEOPLE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\bmy (mom|dad|mother|father|parents?|friends?|partner|boyfriend|girlfriend|classmates?|teacher|boss|sister|brother)\b")
});

static PLACES: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bat (school|work|home|the office|office|class)\b"));

/// People and places named in the message, lowercased, first mention order.
pub fn key_entities(text: &str) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    for regex in [&*PEOPLE, &*PLACES] {
        for caps in regex.captures_iter(text) {
            let entity = caps[1].to_lowercase();
            if !entities.contains(&entity) {
                entities.push(entity);
            }
        }
    }
    entities
}

// ═══════════════════════════════════════════════════════════
// Implicit requests
// ═══════════════════════════════════════════════════════════

static RESOURCE_QUESTION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bhow (does|will|can) (that|this|it|they).{0,20}help",
        r"(?i)\bwhy (should|would) i (call|reach out|contact)",
        r"(?i)\bwhat (can|will|do) they (do|say)",
        r"(?i)\bwhat.?s (that|this).{0,20}(got to do|do|have to do).{0,20}with me",
        r"(?i)\bhow.{0,10}(is|does) that.{0,10}(help|relevant|related)",
    ])
});

static CLARIFICATION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(what|why).{0,20}(concern|worr)",
        r"(?i)\bjust (a|an)\b",
        r"(?i)\bwhat are you.{0,20}(concern|worr|talking about)",
    ])
});

static HEARD: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[r"(?i)\bnobody listens\b", r"(?i)\bno one understands\b", r"(?i)\balone\b"])
});

static ADVICE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwhat should i\b",
        r"(?i)\bhelp me\b",
        r"(?i)\bdon'?t know what to do\b",
        r"(?i)\bhow do i\b",
        r"(?i)\bwhat can i do\b",
    ])
});

static IDENTITY: LazyLock<PatternTable<ImplicitRequest>> = LazyLock::new(|| {
    use ImplicitRequest::*;
    PatternTable::new(vec![
        tagged("who_am_i", r"(?i)\b(who am i|what'?s my name|what is my name|do you know my name|say my name)\b", IdentityName, 1),
        tagged("my_email", r"(?i)\b(my e-?mail|e-?mail address)\b", IdentityEmail, 1),
        tagged("know_me", r"(?i)\b(do you (know|remember) me|know who i am|remember who i am)\b", IdentityRecognition, 1),
    ])
});

/// Last assistant reply carried crisis resources or concern.
fn last_reply_was_crisis(last_bot: Option<&str>, markers: &[&str]) -> bool {
    last_bot
        .map(str::to_lowercase)
        .is_some_and(|bot| markers.iter().any(|m| bot.contains(m)))
}

/// What the user wants without saying it, in a fixed order.
pub fn implicit_requests(
    text: &str,
    tone: EmotionalTone,
    topic: TopicType,
    last_bot: Option<&str>,
) -> Vec<ImplicitRequest> {
    let mut requests = Vec::new();

    if topic == TopicType::Question {
        if last_reply_was_crisis(last_bot, &["hotline"]) && RESOURCE_QUESTION.is_match(text) {
            requests.push(ImplicitRequest::CrisisResourceQuestion);
        }
        if last_reply_was_crisis(last_bot, &["hotline", "extremely concerned", "really concerned"])
            && CLARIFICATION.is_match(text)
        {
            requests.push(ImplicitRequest::CrisisClarification);
        }
    }

    if matches!(tone, EmotionalTone::Negative | EmotionalTone::Crisis | EmotionalTone::Anxiety) {
        requests.push(ImplicitRequest::Empathy);
    }
    if topic == TopicType::Gratitude {
        requests.push(ImplicitRequest::AcknowledgeGratitude);
    }
    if tone == EmotionalTone::PostCrisis {
        requests.push(ImplicitRequest::GentleEncouragement);
    }
    if topic == TopicType::PlayfulBanter {
        requests.push(ImplicitRequest::MatchPlayfulEnergy);
    }
    if HEARD.is_match(text) {
        requests.push(ImplicitRequest::ValidationOfExperience);
    }
    if ADVICE.is_match(text) {
        requests.push(ImplicitRequest::Guidance);
    }
    if word_count(text) > 30 && !text.contains('?') {
        requests.push(ImplicitRequest::SpaceToTalk);
    }
    requests
}

/// Identity questions, appended after the implicit requests.
pub fn identity_questions(text: &str) -> Vec<ImplicitRequest> {
    let mut found: Vec<ImplicitRequest> = IDENTITY.matches(text).map(|row| row.tag).collect();
    found.dedup();
    found
}

/// Enough has been shared that guidance beats more exploration.
pub fn should_offer_guidance(depth: usize, disclosure_depth: u8, text: &str) -> bool {
    (depth >= 3 && disclosure_depth >= 3) || ADVICE.is_match(text)
}

// ═══════════════════════════════════════════════════════════
// Corrections and contradictions
// ═══════════════════════════════════════════════════════════

static CORRECTION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bdidn'?t i\b",
        r"(?i)\bi just said\b",
        r"(?i)\bi already told\b",
        r"(?i)\byou'?re not listening\b",
    ])
});

static FINE_WORDS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(fine|good|ok|okay)\b"));

static NOT_FINE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(not good|bad|terrible|awful)\b"));

/// The user is telling us we missed something they said.
pub fn is_correction(text: &str) -> bool {
    CORRECTION.is_match(text)
}

/// User turns in the history that correct the assistant.
pub fn count_corrections(history: &[Turn]) -> usize {
    user_texts(history).filter(|t| is_correction(t)).count()
}

/// "I'm fine" somewhere and "I'm awful" somewhere else.
pub fn contradictions(history: &[Turn]) -> Vec<Contradiction> {
    let texts: Vec<&str> = user_texts(history).collect();
    let said_fine = texts.iter().any(|t| FINE_WORDS.is_match(t));
    let said_not_fine = texts.iter().any(|t| NOT_FINE_WORDS.is_match(t));
    if said_fine && said_not_fine {
        vec![Contradiction::EmotionalStateMismatch]
    } else {
        Vec::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Emotional context and recommendations
// ═══════════════════════════════════════════════════════════

static EXPLANATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(because|cause|cuz|since|when|after|about|why|ever since|my|they|he|she)\b")
});

static RECOMMENDATION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bany (more |other )?ideas\b",
        r"(?i)\bwhat (should|can) i do\b",
        r"(?i)\bwhat'?s (best|good) to\b",
        r"(?i)\bgive me (some |more )?(ideas|suggestions)\b",
        r"(?i)\b(more|other) (ideas|suggestions|options)\b",
        r"(?i)\b(recommend|suggest)\b",
    ])
});

/// Short message with nothing explaining where the feeling comes from.
pub fn lacks_context(text: &str) -> bool {
    word_count(text) <= 10 && !EXPLANATION.is_match(text)
}

/// The user is asking for ideas or recommendations.
pub fn is_recommendation_request(text: &str) -> bool {
    RECOMMENDATION.is_match(text)
}

/// Early emotional turn with a bare feeling: the reply has to ask what
/// happened.
pub fn needs_clarifying_question(context: &ConversationContext, text: &str) -> bool {
    context.is_emotional()
        && context.conversation_depth <= 3
        && lacks_context(text)
        && !context.is_playful()
        && !context.message_elements.has(MessageElement::Goodbye)
        && context.task_mode.is_none()
        && !is_recommendation_request(text)
}

// ═══════════════════════════════════════════════════════════
// Task mode
// ═══════════════════════════════════════════════════════════

static TASKS: LazyLock<PatternTable<TaskMode>> = LazyLock::new(|| {
    use TaskMode::*;
    PatternTable::new(vec![
        tagged("letter_write", r"(?i)\b(christmas letter|holiday letter|greeting card|write .{0,30}(letter|note|message|poem))\b", Letter, 1),
        tagged("letter_for", r"(?i)\b(message for|note to|card for|letter to)\b", Letter, 1),
        tagged("list_make", r"(?i)\b(make a list|list of|steps for)\b", List, 1),
        tagged("list_ideas", r"(?i)\b(ideas for|suggestions for|options for)\b", List, 1),
        tagged("plan_make", r"(?i)\b(plan for|make a schedule|help me organi[sz]e)\b", Plan, 1),
        tagged("plan_prepare", r"(?i)\b(how to .{0,20}prepare|prepare for)\b", Plan, 1),
        tagged("longer", r"(?i)\b(longer response|more detail|explain more|elaborate|write longer|more words|expand on that)\b", Longer, 1),
    ])
});

/// Explicit writing task in the user's message.
pub fn task_mode(text: &str) -> Option<TaskMode> {
    TASKS.first_tag(text)
}
