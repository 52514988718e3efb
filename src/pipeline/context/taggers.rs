//! Single-label taggers: temporal scope, emotional tone, topic type,
//! urgency and disclosure depth.
//!
//! Each tagger is a `PatternTable` walked in priority order. The first
//! matching row decides, except tone, which weighs signal families.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::models::{EmotionalTone, TemporalScope, TopicType, UrgencyLevel};
use crate::pipeline::patterns::{compile, phrase_set, tagged, PatternTable};
use crate::session::UserProfile;

// ═══════════════════════════════════════════════════════════
// Temporal scope
// ═══════════════════════════════════════════════════════════

static TEMPORAL: LazyLock<PatternTable<TemporalScope>> = LazyLock::new(|| {
    use TemporalScope::*;
    PatternTable::new(vec![
        tagged("ongoing_frequency", r"(?i)\b(always|constantly|every (day|time|week|night)|never stops?|all the time)\b", Ongoing, 1),
        tagged("ongoing_verb", r"(?i)\b(keeps? \w+ing|won'?t stop|continues to|ongoing)\b", Ongoing, 1),
        tagged("ongoing_adverb", r"(?i)\b(habitually|repeatedly|continuously|persistently)\b", Ongoing, 1),
        tagged("single_when", r"(?i)\b(today|yesterday|this morning|tonight|just now|earlier)\b", SingleEvent, 1),
        tagged("single_once", r"(?i)\b(one time|once|this time|that time)\b", SingleEvent, 1),
        tagged("past_marker", r"(?i)\b(used to|back then|in the past|previously|last (year|month))\b", Past, 1),
        tagged("past_progressive", r"(?i)\b(was|were|had been) \w+ing\b", Past, 1),
        tagged("past_ended", r"(?i)\b(no longer|not anymore|stopped)\b", Past, 1),
        tagged("future_marker", r"(?i)\b(will|going to|planning to|next (week|month|year))\b", Future, 1),
        tagged("future_when", r"(?i)\b(tomorrow|soon|upcoming|in the future)\b", Future, 1),
        tagged("hypothetical_marker", r"(?i)\b(what if|suppose|imagine|wonder if|thinking about)\b", Hypothetical, 1),
        tagged("hypothetical_modal", r"(?i)\b(could|might|would|should) \w+ if\b", Hypothetical, 1),
    ])
});

/// Timeframe of the message; a single event when nothing matches.
pub fn temporal_scope(text: &str) -> TemporalScope {
    TEMPORAL.first_tag(text).unwrap_or(TemporalScope::SingleEvent)
}

// ═══════════════════════════════════════════════════════════
// Emotional tone
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Crisis,
    Negative,
    Positive,
    Anxiety,
    Contrast,
}

static TONE: LazyLock<PatternTable<Signal>> = LazyLock::new(|| {
    use Signal::*;
    PatternTable::new(vec![
        tagged("crisis_death", r"(?i)\b(want to die|suicide|kill myself|end it all|no reason to live)\b", Crisis, 1),
        tagged("crisis_breaking", r"(?i)\b(can'?t take it anymore|better off dead|no way out)\b", Crisis, 1),
        tagged("negative_feeling", r"(?i)\b(sad|depressed|upset|angry|furious|mad|frustrated|scared|lonely)\b", Negative, 1),
        tagged("negative_judgement", r"(?i)\b(hate|terrible|awful|horrible|bad|worst|crying|hurt|miserable)\b", Negative, 1),
        tagged("negative_state", r"(?i)\b(not (good|ok|okay|fine|great)|feeling (bad|down|low))\b", Negative, 2),
        tagged("positive_feeling", r"(?i)\b(happy|excited|glad|great|good|better|wonderful|amazing)\b", Positive, 1),
        tagged("positive_pride", r"(?i)\b(relieved|proud|accomplished|love|enjoy)\b", Positive, 1),
        tagged("anxiety", r"(?i)\b(anxious|anxiety|nervous|worried|worry|panick?(ing|y)?|on edge|uneasy|overthinking)\b", Anxiety, 1),
        tagged("contrast", r"(?i)\b(but|although|however)\b", Contrast, 1),
    ])
});

static STABILIZATION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(will|going to|thank|appreciate|better|calmer|okay|safe now)\b",
        r"(?i)\bi'?ll (call|try|reach out|talk to)\b",
    ])
});

/// Tone of the message. Reads and updates the session's crisis-decay state:
/// a crisis hit opens (or reopens) the window, a stabilizing message inside
/// it is tagged post-crisis.
pub fn emotional_tone(text: &str, profile: &mut UserProfile) -> EmotionalTone {
    if TONE.weight_for(text, Signal::Crisis) > 0 {
        profile.mark_crisis();
        return EmotionalTone::Crisis;
    }

    if profile.recent_crisis && STABILIZATION.is_match(text) {
        return EmotionalTone::PostCrisis;
    }

    let negative = TONE.weight_for(text, Signal::Negative);
    let positive = TONE.weight_for(text, Signal::Positive);
    let anxiety = TONE.weight_for(text, Signal::Anxiety);
    let contrast = TONE.weight_for(text, Signal::Contrast);

    if contrast > 0 && negative > 0 && positive > 0 {
        EmotionalTone::Mixed
    } else if anxiety > 0 && negative == 0 && positive == 0 {
        EmotionalTone::Anxiety
    } else if negative + anxiety > positive {
        EmotionalTone::Negative
    } else if positive > negative {
        EmotionalTone::Positive
    } else {
        EmotionalTone::Neutral
    }
}

// ═══════════════════════════════════════════════════════════
// Topic type
// ═══════════════════════════════════════════════════════════

static DECLINING: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)^\s*(no|nah|nope),?\s+thanks?\b",
        r"(?i)^\s*(no|nah|nope),?\s+thank you\b",
        r"(?i)^\s*(i'?m|im)\s+(good|ok|okay|fine|alright),?\s+thank",
        r"(?i)^\s*not?\s+(right now|now|at the moment|yet),?\s+thank",
    ])
});

static QUESTION: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)^\s*(what|why|how|when|where|who|can you)\b",
        r"(?i)\b(recommend|suggest|any good|any ideas|what should|which)\b",
    ])
});

static LITERAL_HUMOR: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bis when\b",
        r"(?i)\bmeans\b",
        r"(?i)\b(ceiling|sky|roof|stars|clouds)\b",
        r"(?i)\b(existing|surviving|vibing|chillin'?)\b",
    ])
});

static PLAYFUL_MINIMAL: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^\s*(nothing much|not much|nm|nmu|nuthin|nothin|just (vibing|chilling|existing|surviving|here)|same old|the usual|alive|existing|surviving|you know|meh|eh)[.!]*\s*$",
    )
});

static LAUGHTER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(lol|haha\w*|lmao|rofl|hehe)\b"));

static PLAYFUL_PHRASE: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\bwell (well|look)\b",
        r"(?i)\blook (what|who)\b",
        r"(?i)\bif it isn'?t\b",
        r"(?i)\bwhat do we have here\b",
        r"(?i)\bfancy (seeing|meeting)\b",
        r"(?i)\bwould you look at (that|this)\b",
    ])
});

static GREETING: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(hi|hello|hey|heya|hola|sup|yo|good (morning|afternoon|evening))\b")
});

static GRATITUDE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(thank|thanks|thx|appreciate|grateful|gratitude)\b"));

static TOPICS: LazyLock<PatternTable<TopicType>> = LazyLock::new(|| {
    use TopicType::*;
    PatternTable::new(vec![
        tagged("achievement", r"(?i)\b(achieved|accomplished|succeeded|won|passed|finished|completed|nailed it|got (the job|accepted|promoted|into))\b", Achievement, 1),
        tagged("relationship_person", r"(?i)\b(friends?|family|parents?|mom|dad|partner|boyfriend|girlfriend|classmates?|crush)\b", Relationship, 1),
        tagged("relationship_event", r"(?i)\b(relationship|argument|fight|broke up)\b", Relationship, 1),
        tagged("feeling_word", r"(?i)\b(feel|feeling|felt|emotions?)\b", Feeling, 1),
        tagged("feeling_because", r"(?i)\b(sad|happy|angry|scared|anxious) (and|but|because)\b", Feeling, 1),
        tagged("problem", r"(?i)\b(problem|issue|trouble|difficult|hard|struggl\w*|can'?t)\b", Problem, 1),
    ])
});

/// "No thanks" and friends: declining, not gratitude.
pub fn is_declining(text: &str) -> bool {
    DECLINING.is_match(text)
}

fn is_literal_humor(text: &str, last_bot: &str) -> bool {
    if LITERAL_HUMOR.is_match(text) {
        return true;
    }
    if text.split_whitespace().count() > 15 {
        return false;
    }
    let bot = last_bot.to_lowercase();
    let lower = text.to_lowercase();
    [
        (["what's up", "whats up"], "up"),
        (["what's going on", "whats going on"], "going on"),
        (["how are you", "how're you"], "are you"),
        (["what's happening", "whats happening"], "happening"),
    ]
    .iter()
    .any(|(prompts, echo)| prompts.iter().any(|p| bot.contains(p)) && lower.contains(echo))
}

/// What the message is about. Earlier checks win.
pub fn topic_type(text: &str, depth: usize, last_bot: Option<&str>) -> TopicType {
    if is_declining(text) {
        return TopicType::General;
    }
    if QUESTION.is_match(text) {
        return TopicType::Question;
    }
    if depth > 0 {
        if let Some(bot) = last_bot {
            if is_literal_humor(text, bot) || PLAYFUL_MINIMAL.is_match(text) {
                return TopicType::PlayfulBanter;
            }
        }
        if LAUGHTER.is_match(text) {
            return TopicType::PlayfulBanter;
        }
    }
    if depth > 2 && PLAYFUL_PHRASE.is_match(text) {
        return TopicType::PlayfulBanter;
    }
    if depth <= 2 && text.split_whitespace().count() <= 4 && GREETING.is_match(text) {
        return TopicType::Greeting;
    }
    if GRATITUDE.is_match(text) {
        return TopicType::Gratitude;
    }
    TOPICS.first_tag(text).unwrap_or(TopicType::General)
}

// ═══════════════════════════════════════════════════════════
// Urgency
// ═══════════════════════════════════════════════════════════

static URGENCY: LazyLock<PatternTable<UrgencyLevel>> = LazyLock::new(|| {
    use UrgencyLevel::*;
    PatternTable::new(vec![
        tagged("high_now", r"(?i)\b(emergency|urgent|right now|immediately|help me)\b", High, 1),
        tagged("high_panic", r"(?i)\b(panic|freaking out|can'?t breathe|spiral(l)?ing)\b", High, 1),
        tagged("medium_recent", r"(?i)\b(today|this morning|just happened|just now)\b", Medium, 1),
        tagged("medium_pressure", r"(?i)\b(really need|desperate|overwhelmed)\b", Medium, 1),
    ])
});

/// How quickly the reply has to help.
pub fn urgency(tone: EmotionalTone, text: &str) -> UrgencyLevel {
    match tone {
        EmotionalTone::Crisis => return UrgencyLevel::Crisis,
        EmotionalTone::PostCrisis => return UrgencyLevel::Low,
        _ => {}
    }
    if let Some(level) = URGENCY.first_tag(text) {
        return level;
    }
    if matches!(tone, EmotionalTone::Neutral | EmotionalTone::Positive) {
        UrgencyLevel::None
    } else {
        UrgencyLevel::Low
    }
}

// ═══════════════════════════════════════════════════════════
// Disclosure depth
// ═══════════════════════════════════════════════════════════

static DISCLOSURE: LazyLock<PatternTable<u8>> = LazyLock::new(|| {
    PatternTable::new(vec![
        tagged("deep_harm", r"(?i)\b(abuse\w*|trauma\w*|suicid\w*|rape\w*|assault\w*|self-?harm|molest\w*)\b", 5, 5),
        tagged("deep_secret", r"(?i)\b(no one (knows|understands)|secret|ashamed)\b", 5, 5),
        tagged("struggle_state", r"(?i)\b(depressed|hopeless|terrified|lonely)\b", 4, 4),
        tagged("struggle_event", r"(?i)\b(family problems|broke up|fired|failed)\b", 4, 4),
        tagged("struggle_alone", r"(?i)\balone (against the world|in the world)\b", 4, 4),
        tagged("moderate_state", r"(?i)\b(upset|frustrated|worried|concerned|bothered|anxious|nervous)\b", 3, 3),
        tagged("moderate_conflict", r"(?i)\b(argument|fight|disagreement)\b", 3, 3),
        tagged("light", r"(?i)\b(annoyed|tired|stressed|busy|angry|mad|furious|bored)\b", 2, 2),
    ])
});

/// 1–5 vulnerability ladder. Deepest level is checked first; exactly one
/// level is returned.
pub fn disclosure_depth(text: &str) -> u8 {
    DISCLOSURE.first_tag(text).unwrap_or(1)
}
