//! Deterministic replies for when generation is exhausted.
//!
//! The fallback is exempt from validation; every template here is written
//! to satisfy the reply contract anyway (plain ASCII, no asterisks, no
//! emoji). The only random choice is the empathy opener, drawn from the
//! injected rng and never the same as the previous one for the session.

use std::sync::LazyLock;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::conversation::latest_user_text;
use crate::models::{CrisisType, EmotionalTone, MessageElement, Turn, UrgencyLevel};
use crate::pipeline::context::requests::is_recommendation_request;
use crate::pipeline::context::{ConversationContext, Priority};
use crate::pipeline::patterns::{tagged, PatternTable};
use crate::pipeline::safety::responses::crisis_response;
use crate::pipeline::safety::CrisisAssessment;
use crate::session::UserProfile;

/// Inputs for one fallback reply.
pub struct FallbackRequest<'a> {
    pub context: &'a ConversationContext,
    pub assessment: &'a CrisisAssessment,
    pub history: &'a [Turn],
    /// Caller-supplied display name.
    pub user_name: Option<&'a str>,
}

// ═══════════════════════════════════════════════════════════
// Templates
// ═══════════════════════════════════════════════════════════

const CLOSER: &str = "I'm here whenever you need.";

const PLAYFUL_LINES: [&str; 3] = [
    "Ha, fair enough. I'm just hanging around here too, so tell me what's new.",
    "Okay, you got me there. So what's keeping you busy lately?",
    "Ha, I walked right into that one. Anything fun going on today?",
];

const EMPATHY_OPENERS: [&str; 5] = [
    "That sounds really hard.",
    "I'm sorry you're dealing with this.",
    "That's a lot to carry.",
    "It makes sense that you feel this way.",
    "Thank you for telling me.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Lonely,
    Anxious,
    Angry,
    Sad,
}

static BUCKETS: LazyLock<PatternTable<Bucket>> = LazyLock::new(|| {
    use Bucket::*;
    PatternTable::new(vec![
        tagged("lonely", r"(?i)\b(lonely|alone|left out|no friends|nobody|no one)\b", Lonely, 1),
        tagged("anxious", r"(?i)\b(anxious|anxiety|worried|nervous|stress\w*|overwhelmed|panic\w*|scared)\b", Anxious, 1),
        tagged("angry", r"(?i)\b(angry|furious|mad|annoyed|frustrated|pissed|irritated)\b", Angry, 1),
        tagged("sad", r"(?i)\b(sad|down|cry\w*|hurt|depressed|empty|miserable|heartbroken)\b", Sad, 1),
    ])
});

/// Early turns: ask what happened. Later turns: stay with the feeling.
fn emotion_body(bucket: Option<Bucket>, depth: usize) -> &'static str {
    let early = depth <= 3;
    match (bucket, early) {
        (Some(Bucket::Lonely), true) => "Feeling alone can wear you down. What has been making it feel that way lately?",
        (Some(Bucket::Lonely), false) => "Feeling left out again and again is exhausting, and it doesn't mean something is wrong with you. Reaching out to even one person you trust could make it a little lighter.",
        (Some(Bucket::Anxious), true) => "Worry like that can take over everything. What's been weighing on you the most?",
        (Some(Bucket::Anxious), false) => "When everything piles up it's hard to think straight. Taking it one small step at a time, starting with whatever feels most urgent, can help.",
        (Some(Bucket::Angry), true) => "Being that angry usually means something really got to you. What happened?",
        (Some(Bucket::Angry), false) => "Your anger makes sense after everything you've described. Giving yourself some space before you respond could help you say what you really mean.",
        (Some(Bucket::Sad), true) => "Feeling that low is really heavy to sit with. What's been going on?",
        (Some(Bucket::Sad), false) => "It's okay to not be okay right now. Being gentle with yourself tonight, and talking to someone close if you can, might help a little.",
        (None, true) => "It sounds like something is bothering you. What's going on?",
        (None, false) => "You've been dealing with a lot. Taking a small break for yourself could help, even just for a few minutes.",
    }
}

static GOODBYE: LazyLock<PatternTable<&'static str>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged("good_night", r"(?i)\b(good ?night|gnight|nite)\b", "Good night", 1),
        tagged("sleep", r"(?i)\b(sleep well|going to (sleep|bed))\b", "Sleep well", 1),
        tagged("see_you", r"(?i)\b(see (you|ya)|catch you later|talk later|ttyl)\b", "See you", 1),
        tagged("bye", r"(?i)\b(bye|goodbye|gotta go|heading (out|off))\b", "Bye", 1),
        tagged("take_care", r"(?i)\btake care\b", "Take care", 1),
    ])
});

static RECOMMENDATIONS: LazyLock<PatternTable<&'static str>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged("watch", r"(?i)\b(movies?|films?|shows?|series|watch|anime)\b",
            "A feel-good comfort show or an old favorite movie is always a safe pick. Something light like a comedy could be nice if your day has been long.", 1),
        tagged("listen", r"(?i)\b(music|songs?|playlist|listen|podcasts?)\b",
            "You could put together a playlist of songs you loved a few years ago. Familiar music has a way of lifting the mood.", 1),
        tagged("read", r"(?i)\b(books?|read|novels?)\b",
            "A short novel or a collection of essays is easy to pick up and put down. Rereading a favorite book also works well when you need something comforting.", 1),
        tagged("eat", r"(?i)\b(food|eat|cook|snack|dinner|lunch|breakfast)\b",
            "Cooking something simple you enjoy, like a warm bowl of noodles or pancakes, can be a nice small reward for yourself.", 1),
    ])
});

const GENERAL_IDEAS: &str = "A short walk outside, a call with a friend, or trying something new on a small scale could all be good options. Pick whichever sounds least like work right now.";

// ═══════════════════════════════════════════════════════════
// Decision tree
// ═══════════════════════════════════════════════════════════

/// Farewell phrase to mirror, only when the user is actually leaving.
fn farewell(context: &ConversationContext, text: &str) -> Option<&'static str> {
    if !context.message_elements.has(MessageElement::Goodbye) {
        return None;
    }
    GOODBYE.first_tag(text)
}

fn with_name(phrase: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{phrase}, {name}."),
        None => format!("{phrase}."),
    }
}

/// Index below `len` other than `last`. Repeats only when nothing else is left.
fn pick_index<R: Rng + ?Sized>(len: usize, last: Option<usize>, rng: &mut R) -> usize {
    let choices: Vec<usize> = (0..len).filter(|i| Some(*i) != last).collect();
    choices.choose(rng).copied().unwrap_or(0)
}

fn pick_opener<R: Rng + ?Sized>(profile: &mut UserProfile, rng: &mut R) -> &'static str {
    let index = pick_index(EMPATHY_OPENERS.len(), profile.last_empathy_opener, rng);
    profile.last_empathy_opener = Some(index);
    EMPATHY_OPENERS[index]
}

fn element_reply(context: &ConversationContext, name: Option<&str>) -> Option<String> {
    let elements = &context.message_elements;
    let critical = context.elements_at(Priority::Critical);
    let mut parts: Vec<String> = Vec::new();

    if critical.contains(&MessageElement::Gratitude) {
        parts.push(with_name("You're welcome", name));
    } else if critical.contains(&MessageElement::NameChange) {
        parts.push(with_name("I'll remember that", name));
    }
    if elements.has(MessageElement::Goodbye) {
        parts.push("Take care.".to_string());
    }
    if elements.has(MessageElement::Question) && !elements.questions.is_empty() {
        parts.push("That's a good question, and I want to get it right.".to_string());
    }
    if parts.is_empty() {
        return None;
    }
    parts.push(CLOSER.to_string());
    Some(parts.join(" "))
}

fn generic(depth: usize) -> &'static str {
    match depth {
        0 => "I'm here and listening. What's on your mind today?",
        1..=3 => "I'm listening. Tell me a bit more about what's going on.",
        _ => "I'm still here with you. What feels most important to talk about right now?",
    }
}

/// Canned reply for the turn. Same inputs and rng state give the same text.
pub fn fallback<R: Rng + ?Sized>(
    request: &FallbackRequest<'_>,
    profile: &mut UserProfile,
    rng: &mut R,
) -> String {
    let context = request.context;
    let text = latest_user_text(request.history);
    let owned_name: Option<String> = context
        .message_elements
        .new_name
        .as_deref()
        .or_else(|| profile.display_name(request.user_name))
        .map(str::to_string);
    let name = owned_name.as_deref();

    if context.emotional_tone == EmotionalTone::Crisis
        || context.urgency_level == UrgencyLevel::Crisis
    {
        let crisis_type = match request.assessment.primary_type {
            CrisisType::Safe => CrisisType::SevereDistress,
            other => other,
        };
        return crisis_response(crisis_type).to_string();
    }

    if let Some(phrase) = farewell(context, text) {
        let mut reply = with_name(phrase, name);
        if context.message_elements.has(MessageElement::Gratitude) {
            reply.push_str(" Thanks for talking with me.");
        }
        reply.push(' ');
        reply.push_str(CLOSER);
        return reply;
    }

    if context.is_playful() {
        return PLAYFUL_LINES[context.conversation_depth % PLAYFUL_LINES.len()].to_string();
    }

    if is_recommendation_request(text) {
        return RECOMMENDATIONS
            .first_tag(text)
            .unwrap_or(GENERAL_IDEAS)
            .to_string();
    }

    if context.emotional_tone.is_distressed() || context.is_emotional() {
        let opener = pick_opener(profile, rng);
        let body = emotion_body(BUCKETS.first_tag(text), context.conversation_depth);
        return format!("{opener} {body}");
    }

    element_reply(context, name).unwrap_or_else(|| generic(context.conversation_depth).to_string())
}
