use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use crate::models::conversation::{latest_user_text, recent_assistant_texts, user_texts, word_count};
use crate::models::{MessageElement, Turn};
use crate::pipeline::context::elements::extract_elements;
use crate::pipeline::patterns::{compile, phrase_set, tagged, words, PatternTable};

use super::entities::{extract_entities, Entities};

/// Cap on tracked assistant question intents.
pub const MAX_BOT_QUESTIONS: usize = 3;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// What a recent assistant question was fishing for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionIntent {
    WhatsOnMind,
    HowAreYou,
    WhatHappened,
    Duration,
    Feelings,
    Plans,
    Activity,
}

impl QuestionIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsOnMind => "what's on their mind",
            Self::HowAreYou => "how they're doing",
            Self::WhatHappened => "what happened",
            Self::Duration => "how long it's been going on",
            Self::Feelings => "how they feel",
            Self::Plans => "their plans",
            Self::Activity => "what they're up to",
        }
    }
}

/// Kind of answer the latest user turn already gave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsweredQuestion {
    /// "I'm fine", "not bad"
    Status,
    /// "just studying", "watching a movie"
    Activity,
    /// "nothing much", "idk"
    Deflection,
}

impl AnsweredQuestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "how they're doing",
            Self::Activity => "what they're doing",
            Self::Deflection => "nothing specific going on",
        }
    }
}

/// Facts derived from the whole history. Rebuilt every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    pub topics_discussed: BTreeSet<String>,
    pub entities_mentioned: Entities,
    pub emotions_expressed: BTreeSet<String>,
    pub first_user_message: Option<String>,
    /// Number of user turns, including the current one.
    pub exchange_count: usize,
    pub has_shared_problem: bool,
    pub last_3_user_messages: Vec<String>,
    pub bot_recent_questions: Vec<QuestionIntent>,
    pub user_answered_questions: BTreeSet<AnsweredQuestion>,
    pub greetings_count: usize,
    pub substantive_exchanges: usize,
    /// Tone-steering label such as "gratitude+problem+humor".
    pub pattern_combination: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// Topics
// ═══════════════════════════════════════════════════════════

const SUBJECT_PREDICATE: &str = "is|are|was|were|has been|have been|keeps?|makes? me|stresse?s? me|drives? me|sucks|is killing me|hard|tough|rough|stressful|going well|going badly|exhausting|fun";

const SUBJECT_LEAD: &str = "about|with|because of|struggling with|worried about|stressed about|problems? with|issues? with|trouble with";

static TOPICS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("school", "school|class(?:es)?|homework|exams?|thesis|grades|college|university"),
        ("social life", "friends?|classmates?|peers?|party|parties|social life"),
        ("family", "family|mom|dad|parents?|siblings?|brother|sister"),
        ("work", "work|job|boss|coworkers?|career|office"),
        ("relationships", "boyfriend|girlfriend|partner|dating|relationship|crush"),
        ("mental health", "anxiety|depression|stress|therapy|mental health"),
        ("health", "health|sickness|illness|sleep|body"),
        ("money", "money|bills|rent|debt|finances"),
    ]
    .into_iter()
    .map(|(label, nouns)| {
        let pattern = format!(
            r"(?i)\b(?:my\s+|the\s+|this\s+)?(?:{nouns})\b[^.?!]{{0,30}}?\b(?:{SUBJECT_PREDICATE})\b|\b(?:{SUBJECT_LEAD})\s+(?:my\s+|the\s+|this\s+)?(?:{nouns})\b"
        );
        (label, compile(&pattern))
    })
    .collect()
});

/// Topics the message is actually about, not merely mentions.
pub fn extract_topics(text: &str) -> BTreeSet<String> {
    TOPICS
        .iter()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(label, _)| (*label).to_string())
        .collect()
}

// ═══════════════════════════════════════════════════════════
// Emotions
// ═══════════════════════════════════════════════════════════

const EMOTION_BUCKETS: [(&str, &[&str]); 6] = [
    ("sadness", &["sad", "depressed", "down", "upset", "unhappy", "miserable", "heartbroken"]),
    ("anger", &["angry", "mad", "furious", "frustrated", "annoyed", "irritated"]),
    ("anxiety", &["anxious", "worried", "nervous", "scared", "afraid", "stressed"]),
    ("loneliness", &["lonely", "alone", "isolated"]),
    ("happiness", &["happy", "excited", "glad", "good", "great"]),
    ("calmness", &["calm", "peaceful", "relaxed"]),
];

/// Emotion buckets whose words appear as whole tokens.
pub fn extract_emotions(text: &str) -> BTreeSet<String> {
    let tokens: BTreeSet<String> = words(text).into_iter().collect();
    EMOTION_BUCKETS
        .iter()
        .filter(|(_, members)| members.iter().any(|m| tokens.contains(*m)))
        .map(|(bucket, _)| (*bucket).to_string())
        .collect()
}

// ═══════════════════════════════════════════════════════════
// Problems, greetings, questions
// ═══════════════════════════════════════════════════════════

static PROBLEM: LazyLock<RegexSet> = LazyLock::new(|| {
    phrase_set(&[
        r"(?i)\b(problem|issue|trouble|difficult|hard|struggl\w*)\b",
        r"(?i)\b(can'?t|cannot|won'?t|unable to)\b",
        r"(?i)\b(hate|dislike|annoying|frustrating)\b",
        r"(?i)\b(nobody|no one).{0,20}(understand|listen|care)",
    ])
});

static GREETING_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^\s*(hi+|hello|hey+|heya|hola|sup|yo|hiya|howdy)(\s+(there|friend|snowfriend))?[\s!.?]*$")
});

static BOT_QUESTIONS: LazyLock<PatternTable<QuestionIntent>> = LazyLock::new(|| {
    use QuestionIntent::*;
    PatternTable::new(vec![
        tagged("on_mind", r"(?i)\b(on your mind|going on|what'?s up|anything new)\b", WhatsOnMind, 1),
        tagged("how_are_you", r"(?i)\b(how are you|how'?s it going|how have you been|how'?s your (day|night|week))\b", HowAreYou, 1),
        tagged("what_happened", r"(?i)\b(what happened|what did (they|he|she) (do|say))\b", WhatHappened, 1),
        tagged("duration", r"(?i)\b(how long|how often|since when)\b", Duration, 1),
        tagged("feelings", r"(?i)\b(how do you feel|how did that feel|feeling about)\b", Feelings, 1),
        tagged("plans", r"(?i)\b(any plans|what are you (going to|planning)|plans for)\b", Plans, 1),
        tagged("activity", r"(?i)\b(what are you (doing|up to)|up to today|been up to)\b", Activity, 1),
    ])
});

static ANSWERS: LazyLock<PatternTable<AnsweredQuestion>> = LazyLock::new(|| {
    use AnsweredQuestion::*;
    PatternTable::new(vec![
        tagged("status", r"(?i)\b(i'?m|im|i am|doing|feeling)\s+(fine|good|okay|ok|alright|great|well|tired|not bad)\b|^\s*(fine|good|okay|not bad)\b", Status, 1),
        tagged("activity", r"(?i)\b(just|i'?m|im|i am)\s+(chilling|relaxing|working|studying|watching|playing|gaming|eating|cooking|reading|resting)\b", Activity, 1),
        tagged("deflection", r"(?i)\b(nothing( much| really)?|not much|nm|idk|i don'?t know|no reason|never ?mind|nvm|whatever|it'?s nothing)\b", Deflection, 1),
    ])
});

fn question_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .filter(|s| s.trim_end().ends_with('?'))
}

/// Intents of questions in the latest assistant turns, newest first.
pub fn bot_recent_questions(history: &[Turn]) -> Vec<QuestionIntent> {
    let mut intents = Vec::new();
    for reply in recent_assistant_texts(history, 3) {
        for sentence in question_sentences(reply) {
            if let Some(intent) = BOT_QUESTIONS.first_tag(sentence) {
                if !intents.contains(&intent) && intents.len() < MAX_BOT_QUESTIONS {
                    intents.push(intent);
                }
            }
        }
    }
    intents
}

/// Answer kinds present in the latest user turn.
pub fn answered_questions(text: &str) -> BTreeSet<AnsweredQuestion> {
    ANSWERS.matches(text).map(|row| row.tag).collect()
}

/// "gratitude+problem+humor" style label; only when two or more parts.
pub fn pattern_combination(text: &str) -> Option<String> {
    let elements = extract_elements(text);
    let parts: Vec<&str> = [
        (MessageElement::Gratitude, "gratitude"),
        (MessageElement::Problem, "problem"),
        (MessageElement::Emotion, "emotion"),
        (MessageElement::Playfulness, "humor"),
        (MessageElement::Question, "question"),
        (MessageElement::Goodbye, "goodbye"),
    ]
    .iter()
    .filter(|(element, _)| elements.has(*element))
    .map(|(_, label)| *label)
    .collect();

    (parts.len() >= 2).then(|| parts.join("+"))
}

/// A short greeting with nothing else in it.
pub fn is_greeting_only(text: &str) -> bool {
    word_count(text) <= 4 && GREETING_ONLY.is_match(text)
}

// ═══════════════════════════════════════════════════════════
// Extraction
// ═══════════════════════════════════════════════════════════

/// Build `Facts` from the full history.
pub fn extract_facts(history: &[Turn]) -> Facts {
    let mut facts = Facts::default();
    let users: Vec<&str> = user_texts(history).collect();

    facts.first_user_message = users.first().map(|s| s.to_string());
    facts.exchange_count = users.len();
    facts.last_3_user_messages = users
        .iter()
        .skip(users.len().saturating_sub(3))
        .map(|s| s.to_string())
        .collect();

    for text in &users {
        if is_greeting_only(text) {
            facts.greetings_count += 1;
        } else {
            facts.substantive_exchanges += 1;
        }
        facts.topics_discussed.extend(extract_topics(text));
        facts.entities_mentioned.absorb(extract_entities(text));
        facts.emotions_expressed.extend(extract_emotions(text));
        facts.has_shared_problem |= PROBLEM.is_match(text);
    }

    facts.bot_recent_questions = bot_recent_questions(history);
    let latest = latest_user_text(history);
    facts.user_answered_questions = answered_questions(latest);
    facts.pattern_combination = pattern_combination(latest);

    tracing::debug!(
        exchanges = facts.exchange_count,
        topics = facts.topics_discussed.len(),
        greetings = facts.greetings_count,
        problem = facts.has_shared_problem,
        "Facts extracted"
    );
    facts
}
